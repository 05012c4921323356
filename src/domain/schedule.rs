use serde::{Deserialize, Serialize};

/// One training day inside a routine: which day of the plan and which muscle
/// group it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub muscle: String,
}

/// Parses the backend's delimited day schedule, e.g. `"1:Pecho;2:Espalda"`.
///
/// Segments are `;`-separated `day:muscle` pairs. Malformed segments (no
/// colon, or an empty muscle name) are dropped rather than reported; the
/// schedule string is display data and a partial render beats none.
pub fn parse(encoded: &str) -> Vec<ScheduleEntry> {
    encoded
        .split(';')
        .filter_map(|segment| {
            let (day, muscle) = segment.split_once(':')?;
            let day = day.trim();
            let muscle = muscle.trim();
            if muscle.is_empty() {
                return None;
            }
            Some(ScheduleEntry {
                day: day.to_string(),
                muscle: muscle.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, muscle: &str) -> ScheduleEntry {
        ScheduleEntry {
            day: day.to_string(),
            muscle: muscle.to_string(),
        }
    }

    #[test]
    fn test_parse_two_days() {
        let entries = parse("1:Pecho;2:Espalda");
        assert_eq!(entries, vec![entry("1", "Pecho"), entry("2", "Espalda")]);
    }

    #[test]
    fn test_segment_without_colon_is_dropped() {
        let entries = parse("1:Pecho;sin-formato;3:Piernas");
        assert_eq!(entries, vec![entry("1", "Pecho"), entry("3", "Piernas")]);
    }

    #[test]
    fn test_empty_muscle_is_dropped() {
        let entries = parse("1:Pecho;2:;3:  ;4:Hombros");
        assert_eq!(entries, vec![entry("1", "Pecho"), entry("4", "Hombros")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse(";;").is_empty());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let entries = parse(" 1 : Pecho ; 2 : Espalda ");
        assert_eq!(entries, vec![entry("1", "Pecho"), entry("2", "Espalda")]);
    }
}
