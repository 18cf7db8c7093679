//! Built-in demo week, used before any calendar is imported

use super::CalendarEvent;

/// (day, start, end, title)
const SAMPLE_WEEK: &[(u32, f32, f32, &str)] = &[
    // Sunday
    (0, 10.0, 11.0, "Brunch"),
    (0, 14.0, 16.0, "Family Time"),
    // Monday
    (1, 8.0, 9.0, "Morning Jog"),
    (1, 9.0, 10.0, "Standup"),
    (1, 11.0, 12.0, "Code Review"),
    (1, 13.0, 14.0, "Lunch & Learn"),
    (1, 15.0, 16.0, "Team Meeting"),
    (1, 16.0, 17.0, "Sprint Planning"),
    // Tuesday
    (2, 8.0, 9.0, "Gym Session"),
    (2, 10.0, 11.0, "1:1 with Manager"),
    (2, 12.0, 13.0, "Lunch with Alice"),
    (2, 14.0, 15.0, "Client Call"),
    (2, 15.0, 16.0, "Design Review"),
    (2, 17.0, 18.0, "Architecture Meeting"),
    // Wednesday
    (3, 8.0, 9.0, "Morning Yoga"),
    (3, 9.0, 10.0, "Daily Standup"),
    (3, 10.0, 12.0, "Feature Development"),
    (3, 13.0, 14.0, "Team Lunch"),
    (3, 15.0, 16.0, "Bug Triage"),
    (3, 16.0, 17.0, "Demo Prep"),
    // Thursday
    (4, 9.0, 10.0, "Standup"),
    (4, 10.0, 11.0, "Security Review"),
    (4, 11.0, 12.0, "Performance Testing"),
    (4, 14.0, 16.0, "Quarterly Presentation"),
    (4, 16.0, 17.0, "Stakeholder Sync"),
    (4, 17.0, 18.0, "Release Planning"),
    // Friday
    (5, 9.0, 10.0, "Standup"),
    (5, 10.0, 11.0, "Code Deployment"),
    (5, 11.0, 12.0, "Doctor Appointment"),
    (5, 13.0, 14.0, "Team Retrospective"),
    (5, 15.0, 16.0, "Knowledge Sharing"),
    (5, 16.0, 18.0, "Happy Hour"),
    // Saturday
    (6, 9.0, 10.0, "Weekend Workout"),
    (6, 10.0, 11.0, "Coffee with Friends"),
    (6, 12.0, 14.0, "Personal Project"),
    (6, 15.0, 16.0, "Grocery Shopping"),
];

/// The sample week as calendar events
pub fn sample_events() -> Vec<CalendarEvent> {
    SAMPLE_WEEK
        .iter()
        .map(|&(day, start, end, title)| CalendarEvent::new(day, start, end, title))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::within_display_window;

    #[test]
    fn test_sample_events_fit_window() {
        let events = sample_events();
        assert_eq!(events.len(), SAMPLE_WEEK.len());
        for e in &events {
            assert!(e.day < 7, "{} has day {}", e.title, e.day);
            assert!(within_display_window(e.start, e.end), "{} out of window", e.title);
        }
    }

    #[test]
    fn test_sample_events_do_not_overlap_within_a_day() {
        let events = sample_events();
        for (i, a) in events.iter().enumerate() {
            for b in events.iter().skip(i + 1).filter(|b| b.day == a.day) {
                assert!(
                    a.end <= b.start || b.end <= a.start,
                    "{} overlaps {}",
                    a.title,
                    b.title
                );
            }
        }
    }
}
