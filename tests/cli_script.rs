mod common;

use std::fs;

use assert_fs::prelude::*;
use predicates::str::contains;
use regex::Regex;

use common::{data_file, run_script, saved_state, temp_home};

#[test]
fn script_mode_books_course_and_plans_session() {
    let home = temp_home();
    let script = r#"
course add "Kat B marzec" --slots 2 2024-03-04 2024-03-05
reservation add --name "Jan Nowak" --phone 600100200 --course "kat b marzec" --advance 500
schedule plan "jan nowak" 2024-03-04 --instructor inst2 --from 09:00 --to 11:00
schedule pending
finance
exit
"#;

    run_script(&home, script)
        .success()
        .stdout(contains("OK: Dodano kurs `Kat B marzec`"))
        .stdout(contains("OK: Dodano rezerwację dla `Jan Nowak`"))
        .stdout(contains("Zaplanowano jazdę na 04.03.2024"))
        .stdout(contains("=== Do zaplanowania (1) ==="))
        .stdout(contains("05.03.2024"))
        .stdout(contains("2700.00 zł"));

    let state = saved_state(&home);
    assert_eq!(state.courses.len(), 1);
    assert_eq!(state.courses[0].slots, 1);
    assert_eq!(state.courses[0].reservations, 1);
    assert_eq!(state.reservations.len(), 1);
    assert_eq!(state.reservations[0].paid_amount(), 500.0);
    let entries: Vec<_> = state.schedule.iter().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].1.instructor_id, "inst2");
    assert_eq!(entries[0].1.description, "Jazda - Jan Nowak");
}

#[test]
fn script_mode_reports_errors_and_keeps_going() {
    let home = temp_home();
    let script = "
reservation add --name Ala --phone 500
reservation add --phone 500 --course nothing
reservation add --phone 500 --dates 2024-03-04
bogus
cours list
dashboard
";

    run_script(&home, script)
        .success()
        .stdout(contains("BŁĄD: Proszę wybrać kurs."))
        .stdout(contains("BŁĄD: Nie znaleziono kursu: nothing"))
        .stdout(contains(
            "BŁĄD: Proszę podać imię i nazwisko oraz numer telefonu kursanta.",
        ))
        .stdout(contains("Nieznane polecenie `bogus`"))
        .stdout(contains("Czy chodziło o `course`?"))
        .stdout(contains("=== Osk Menager ==="))
        .stdout(contains("Kursanci: 0"));

    assert!(!data_file(&home).exists(), "failed commands must not save");
}

#[test]
fn individual_booking_blocks_calendar_days() {
    let home = temp_home();
    let script = r#"
reservation add --name "Ola Lis" --phone 700200300 --dates 2024-03-10,2024-03-11 --category A
course add "Kat B" --slots 5 2024-03-11
calendar 2024-03
reservation show "ola lis"
course delete "Ind: Ola Lis" --yes
course dates "Ind: Ola Lis" 2024-03-12
"#;

    run_script(&home, script)
        .success()
        .stdout(contains("Indywidualny - A"))
        .stdout(contains("BŁĄD: Ten dzień jest już zarezerwowany."))
        .stdout(contains("(10)"))
        .stdout(contains("(11)"))
        .stdout(contains("Do zaplanowania: 10.03.2024, 11.03.2024"))
        .stdout(contains("2800.00 zł (Do zapłaty)"))
        .stdout(contains(
            "BŁĄD: Rezerwację indywidualną zmienia się z poziomu rezerwacji.",
        ));

    let state = saved_state(&home);
    assert_eq!(state.courses.len(), 1);
    assert!(state.courses[0].is_individual);
    assert_eq!(state.courses[0].dates.len(), 2);
    assert_eq!(state.reservations.len(), 1);
}

#[test]
fn settings_changes_wait_for_save() {
    let home = temp_home();
    run_script(&home, "settings price B 3500\nsettings title \"OSK Test\"\nexit\n")
        .success()
        .stdout(contains("Niezapisane zmiany w ustawieniach zostały porzucone."));
    assert!(!data_file(&home).exists());

    run_script(&home, "settings price B 3500\nsettings save\nsettings show\n")
        .success()
        .stdout(contains("OK: Ustawienia zostały zapisane."))
        .stdout(contains("B: 3500.00 zł"));
    let state = saved_state(&home);
    assert_eq!(state.course_prices.b, 3500.0);
    assert_eq!(state.app_title, "Osk Menager");
}

#[test]
fn backup_and_import_round_trip_between_homes() {
    let source = temp_home();
    let target = temp_home();
    let backups = temp_home();

    run_script(
        &source,
        &format!(
            "course add \"Kat C\" --slots 4 2024-04-02\ndata backup {}\n",
            backups.display()
        ),
    )
    .success()
    .stdout(contains("osk_manager_backup_2024-03-01.json"));
    let backup = backups.join("osk_manager_backup_2024-03-01.json");
    assert!(backup.exists());

    run_script(&target, &format!("data import {}\n", backup.display()))
        .success()
        .stdout(contains("Dodaj `--yes`, aby potwierdzić."));
    assert!(!data_file(&target).exists());

    run_script(
        &target,
        &format!(
            "data import {}/missing.json --yes\ndata import {} --yes\ncourse list\n",
            backups.display(),
            backup.display()
        ),
    )
    .success()
    .stdout(contains("Nie znaleziono pliku"))
    .stdout(contains("OK: Dane zostały zaimportowane."))
    .stdout(contains("Kat C"));
    assert_eq!(saved_state(&target), saved_state(&source));
}

#[test]
fn reports_are_written_to_the_output_directory() {
    let home = temp_home();
    let out = temp_home();
    let script = format!(
        r#"
course add "Kat B marzec" --slots 3 2024-03-04
reservation add --name "Jan Nowak" --phone 600 --course "Kat B marzec"
schedule plan "Jan Nowak" 2024-03-04 --instructor inst1
export schedule --period month --out {out}
export students --format doc --out {out}
export schedule --period day --out {out}
"#,
        out = out.display()
    );

    run_script(&home, &script)
        .success()
        .stdout(contains("Zapisano raport"))
        .stdout(contains(
            "BŁĄD: Brak danych do wyeksportowania dla wybranych kryteriów.",
        ));

    let schedule =
        fs::read_to_string(out.join("grafik_Wszyscy_instruktorzy_2024-03-01.txt")).unwrap();
    assert!(schedule.starts_with("Raport grafiku\n"));
    assert!(schedule.contains("Instruktor: Jan Kowalski | Kursant: Jan Nowak"));
    let stamp = Regex::new(r"Wygenerowano: \d{1,2}\.\d{2}\.\d{4}, \d{2}:\d{2}:\d{2}").unwrap();
    assert!(stamp.is_match(&schedule));

    let students = fs::read_to_string(out.join("eksport_kursantow_2024-03-01.doc")).unwrap();
    assert!(students.contains("Imię i nazwisko: Jan Nowak"));
    assert!(students.contains("Zaliczka: Nie zapłacono"));
}

#[test]
fn config_values_persist_and_are_validated() {
    let home = temp_home();
    run_script(
        &home,
        "config set default_export_format doc\nconfig get default_export_format\nconfig set default_export_format pdf\n",
    )
    .success()
    .stdout(contains("OK: Ustawiono default_export_format = doc"))
    .stdout(contains("BŁĄD:"));

    let config = fs::read_to_string(home.join("config").join("config.json")).unwrap();
    assert!(config.contains("\"doc\""));
}

#[test]
fn corrupt_data_file_is_set_aside_on_start() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child("data").create_dir_all().unwrap();
    home.child("data/oskMenagerData.json")
        .write_str("{ not json")
        .unwrap();

    run_script(home.path(), "dashboard\n")
        .success()
        .stdout(contains("Nie udało się wczytać zapisanych danych"))
        .stdout(contains("Kursanci: 0"));

    let moved = fs::read_dir(home.path().join("data"))
        .unwrap()
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().contains("corrupt"));
    assert!(moved);
}

#[test]
fn help_and_version_are_available() {
    let home = temp_home();
    run_script(&home, "help\nhelp course\nversion\n")
        .success()
        .stdout(contains("=== Dostępne polecenia ==="))
        .stdout(contains("=== Pomoc: course ==="))
        .stdout(contains("OSK Manager"));
}
