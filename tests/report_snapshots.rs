mod common;

use osk_core::{
    BookingRequest, CourseDraft, DateSelection, ExportFormat, ExportPeriod, InstructorFilter,
    PlanRequest, ReservationForm,
};
use osk_domain::{CourseCategory, Student, TimeOfDay};
use osk_manager::core::AppManager;

use common::{day, open_manager, temp_home};

fn school() -> AppManager {
    let mut manager = open_manager(&temp_home());
    let course_id = manager
        .create_course(
            CourseDraft::named("Kat B marzec", 10),
            DateSelection::new().with_dates([day(2024, 3, 4), day(2024, 3, 5)]),
        )
        .unwrap();

    let mut jan = Student::new("Jan Nowak", "600100200");
    jan.email = "jan@example.com".into();
    let mut form = ReservationForm::new(manager.state()).with_student(jan);
    form.category = CourseCategory::B;
    form.advance_paid = true;
    form.advance_amount = 500.0;
    let jan_id = manager
        .create_reservation(form, BookingRequest::Course(course_id))
        .unwrap();

    let mut ola = Student::new("Ola Lis", "700200300");
    ola.pesel = "02210112345".into();
    let mut form = ReservationForm::new(manager.state()).with_student(ola);
    form.category = CourseCategory::A;
    let selection = DateSelection::new().with_dates([day(2024, 3, 10), day(2024, 3, 11)]);
    manager
        .create_reservation(form, BookingRequest::Individual(selection))
        .unwrap();

    let first = PlanRequest {
        instructor_id: Some("inst2".into()),
        start_time: TimeOfDay::new(9, 0),
        end_time: TimeOfDay::new(11, 0),
        ..PlanRequest::new(day(2024, 3, 4), jan_id.clone())
    };
    manager.plan_session(first).unwrap();
    let second = PlanRequest {
        description: Some("Plac manewrowy".into()),
        ..PlanRequest::new(day(2024, 3, 5), jan_id)
    };
    manager.plan_session(second).unwrap();
    manager
}

#[test]
fn schedule_report_for_the_month() {
    let manager = school();
    let document = manager
        .export_schedule(&InstructorFilter::All, ExportPeriod::Month, ExportFormat::Txt)
        .unwrap();
    assert_eq!(document.filename, "grafik_Wszyscy_instruktorzy_2024-03-01.txt");
    insta::assert_snapshot!("schedule_report_month", document.content.trim_end());
}

#[test]
fn schedule_report_for_one_instructor() {
    let manager = school();
    let filter = InstructorFilter::Only("inst1".into());
    let document = manager
        .export_schedule(&filter, ExportPeriod::All, ExportFormat::Doc)
        .unwrap();
    assert_eq!(document.filename, "grafik_Jan_Kowalski_2024-03-01.doc");
    insta::assert_snapshot!("schedule_report_inst1", document.content.trim_end());
}

#[test]
fn students_report_lists_every_booking() {
    let manager = school();
    let document = manager
        .export_students(None, ExportPeriod::All, ExportFormat::Txt)
        .unwrap();
    assert_eq!(document.filename, "eksport_kursantow_2024-03-01.txt");
    insta::assert_snapshot!("students_report_all", document.content.trim_end());
}
