use serde::{Deserialize, Serialize};

use crate::common::{Displayable, Identifiable, NamedEntity};

pub const DEFAULT_INSTRUCTOR_COLOR: &str = "#d32f2f";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instructor {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_INSTRUCTOR_COLOR.into()
}

impl Instructor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

impl Identifiable for Instructor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Instructor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Instructor {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.name, self.id)
    }
}

/// Staff seeded into a fresh installation.
pub fn default_instructors() -> Vec<Instructor> {
    vec![
        Instructor::new("inst1", "Jan Kowalski", "#ef5350"),
        Instructor::new("inst2", "Anna Nowak", "#42a5f5"),
        Instructor::new("inst3", "Piotr Wiśniewski", "#66bb6a"),
        Instructor::new("inst4", "Zofia Dąbrowska", "#ab47bc"),
    ]
}
