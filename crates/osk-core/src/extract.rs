//! Pulling student details out of pasted free text.

use osk_domain::Student;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

pub const MSG_PASTE_REQUIRED: &str = "Proszę wkleić dane do przetworzenia.";
pub const MSG_EXTRACTION_FAILED: &str =
    "Nie udało się przetworzyć danych. Sprawdź konsolę, aby uzyskać więcej informacji.";

/// Fields recognised in the text. Anything not found comes back empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedStudent {
    pub name: String,
    pub pesel: String,
    pub pkk: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl ExtractedStudent {
    /// Overwrites every student field, blanks included.
    pub fn apply_to(self, student: &mut Student) {
        student.name = self.name;
        student.pesel = self.pesel;
        student.pkk = Some(self.pkk).filter(|pkk| !pkk.is_empty());
        student.phone = self.phone;
        student.email = self.email;
        student.address = self.address;
    }
}

/// Turns free text into student fields. Implementations may call out to a model
/// or parse locally; the call is synchronous.
pub trait StudentExtractor: Send + Sync {
    fn extract(&self, text: &str) -> CoreResult<ExtractedStudent>;
}

/// Runs the extractor and fills `student` on success. On failure the student is
/// left exactly as it was.
pub fn fill_student_from_text(
    extractor: &dyn StudentExtractor,
    text: &str,
    student: &mut Student,
) -> CoreResult<()> {
    if text.trim().is_empty() {
        return Err(CoreError::validation(MSG_PASTE_REQUIRED));
    }
    match extractor.extract(text) {
        Ok(extracted) => {
            extracted.apply_to(student);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "student extraction failed");
            Err(CoreError::Extraction(MSG_EXTRACTION_FAILED.into()))
        }
    }
}

/// Line-oriented extractor for `Label: value` text such as copied forms.
///
/// Recognises Polish and English labels; unlabelled lines are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabeledTextExtractor;

impl StudentExtractor for LabeledTextExtractor {
    fn extract(&self, text: &str) -> CoreResult<ExtractedStudent> {
        let mut extracted = ExtractedStudent::default();
        let mut matched = false;
        for line in text.lines() {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            let slot = match label.trim().to_lowercase().as_str() {
                "imię i nazwisko" | "imie i nazwisko" | "kursant" | "name" => &mut extracted.name,
                "pesel" | "nr pesel" => &mut extracted.pesel,
                "pkk" | "nr pkk" => &mut extracted.pkk,
                "telefon" | "nr telefonu" | "tel" | "phone" => &mut extracted.phone,
                "email" | "e-mail" | "adres e-mail" => &mut extracted.email,
                "adres" | "address" => &mut extracted.address,
                _ => continue,
            };
            *slot = value;
            matched = true;
        }
        if matched {
            Ok(extracted)
        } else {
            Err(CoreError::Extraction("Nie rozpoznano żadnych pól.".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl StudentExtractor for Failing {
        fn extract(&self, _text: &str) -> CoreResult<ExtractedStudent> {
            Err(CoreError::Extraction("offline".into()))
        }
    }

    #[test]
    fn labeled_text_fills_fields_and_blanks_the_rest() {
        let mut student = Student::new("Stary", "111");
        student.address = "Stary adres".into();
        let text = "Imię i nazwisko: Anna Nowak\nTelefon: 600 100 200\nPESEL: 90010112345";
        fill_student_from_text(&LabeledTextExtractor, text, &mut student).unwrap();
        assert_eq!(student.name, "Anna Nowak");
        assert_eq!(student.phone, "600 100 200");
        assert_eq!(student.pesel, "90010112345");
        assert_eq!(student.address, "");
        assert_eq!(student.pkk, None);
    }

    #[test]
    fn failure_leaves_student_untouched() {
        let mut student = Student::new("Jan", "600");
        let before = student.clone();
        let err = fill_student_from_text(&Failing, "cokolwiek", &mut student).unwrap_err();
        assert_eq!(err.to_string(), MSG_EXTRACTION_FAILED);
        assert_eq!(student, before);
    }

    #[test]
    fn blank_paste_is_rejected() {
        let mut student = Student::default();
        let err = fill_student_from_text(&LabeledTextExtractor, "  ", &mut student).unwrap_err();
        assert_eq!(err.to_string(), MSG_PASTE_REQUIRED);
    }
}
