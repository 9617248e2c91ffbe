//! TwiML generation for the spoken reminder.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Escape characters with markup meaning so the `<Say>` payload stays
/// well-formed no matter what the event title contains.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Wall-clock start time in the event's zone, e.g. "2:30 PM".
pub fn spoken_time(start: DateTime<Utc>, zone: Tz) -> String {
    start.with_timezone(&zone).format("%-I:%M %p").to_string()
}

/// The announcement line for one reminder.
pub fn spoken_message(summary: &str, start: DateTime<Utc>, zone: Tz) -> String {
    format!(
        "Reminder: you have an upcoming event: {}, starting at {}.",
        escape_xml(summary),
        spoken_time(start, zone),
    )
}

/// Full TwiML document: announce the event, pause, say goodbye, hang up.
pub fn reminder_twiml(summary: &str, start: DateTime<Utc>, zone: Tz) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Response>\n\
         <Say voice=\"alice\" language=\"en-US\">{}</Say>\n\
         <Pause length=\"1\"/>\n\
         <Say voice=\"alice\" language=\"en-US\">Goodbye.</Say>\n\
         <Hangup/>\n\
         </Response>",
        spoken_message(summary, start, zone),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn eastern() -> Tz {
        "America/New_York".parse().unwrap()
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_xml(r#"<Q&A> "planning" session's"#),
            "&lt;Q&amp;A&gt; &quot;planning&quot; session&apos;s"
        );
    }

    #[test]
    fn speaks_time_in_the_event_zone() {
        // 19:30 UTC on a March date is 14:30 in New York (EST, UTC-5).
        let start = Utc.with_ymd_and_hms(2026, 3, 5, 19, 30, 0).unwrap();
        assert_eq!(spoken_time(start, eastern()), "2:30 PM");
    }

    #[test]
    fn message_names_the_event_and_local_time() {
        let start = Utc.with_ymd_and_hms(2026, 3, 5, 19, 30, 0).unwrap();
        let message = spoken_message("Standup", start, eastern());
        assert_eq!(
            message,
            "Reminder: you have an upcoming event: Standup, starting at 2:30 PM."
        );
    }

    #[test]
    fn twiml_is_a_full_voice_script() {
        let start = Utc.with_ymd_and_hms(2026, 3, 5, 19, 30, 0).unwrap();
        let twiml = reminder_twiml("Standup", start, eastern());
        assert!(twiml.starts_with("<?xml"));
        assert!(twiml.contains("Standup"));
        assert!(twiml.contains("Goodbye."));
        assert!(twiml.contains("<Hangup/>"));
    }

    #[test]
    fn twiml_stays_well_formed_with_hostile_titles() {
        let start = Utc.with_ymd_and_hms(2026, 3, 5, 19, 30, 0).unwrap();
        let twiml = reminder_twiml("<Say>pwned</Say>", start, eastern());
        assert!(!twiml.contains("<Say>pwned</Say>"));
        assert!(twiml.contains("&lt;Say&gt;pwned&lt;/Say&gt;"));
    }
}
