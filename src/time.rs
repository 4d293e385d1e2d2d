use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Minutes since midnight of the planning day.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time(pub i32);

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hours = self.0.div_euclid(60);
        let mins = self.0.rem_euclid(60);
        write!(f, "{:02}:{:02}", hours, mins)
    }
}

impl FromStr for Time {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedTimeExpr(s.to_string());
        let (hours, mins) = s.split_once(':').ok_or_else(malformed)?;
        let hours: i32 = hours.parse().map_err(|_| malformed())?;
        let mins: i32 = mins.parse().map_err(|_| malformed())?;
        if !(0..24).contains(&hours) || !(0..60).contains(&mins) {
            return Err(malformed());
        }
        Ok(Time(hours * 60 + mins))
    }
}

impl TryFrom<String> for Time {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Time> for String {
    fn from(t: Time) -> String {
        t.to_string()
    }
}

impl Add<i32> for Time {
    type Output = Self;

    fn add(self, rhs: i32) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl Sub<i32> for Time {
    type Output = Self;

    fn sub(self, rhs: i32) -> Self::Output {
        Time(self.0 - rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAnchor {
    Arrival,
    Departure,
}

/// A service time relative to a flight: `A`, `D`, `A+k`, `A-k`, `D+k` or `D-k`
/// with `k` an offset in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceTimeExpr {
    anchor: TimeAnchor,
    offset: i32,
}

impl ServiceTimeExpr {
    pub fn resolve(&self, arrival: Time, departure: Time) -> Time {
        let base = match self.anchor {
            TimeAnchor::Arrival => arrival,
            TimeAnchor::Departure => departure,
        };
        base + self.offset
    }
}

impl std::fmt::Display for ServiceTimeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let anchor = match self.anchor {
            TimeAnchor::Arrival => 'A',
            TimeAnchor::Departure => 'D',
        };
        match self.offset {
            0 => write!(f, "{}", anchor),
            o if o < 0 => write!(f, "{}-{}", anchor, -o),
            o => write!(f, "{}+{}", anchor, o),
        }
    }
}

impl FromStr for ServiceTimeExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedTimeExpr(s.to_string());
        let anchor = match s.chars().next() {
            Some('A') => TimeAnchor::Arrival,
            Some('D') => TimeAnchor::Departure,
            _ => return Err(malformed()),
        };
        let mut rest = s[1..].chars();
        let Some(sign) = rest.next() else {
            return Ok(ServiceTimeExpr { anchor, offset: 0 });
        };
        // u16 keeps the sign out of the digit parse, so "A+-3" is rejected
        let minutes: u16 = rest.as_str().parse().map_err(|_| malformed())?;
        let offset = match sign {
            '+' => minutes as i32,
            '-' => -(minutes as i32),
            _ => return Err(malformed()),
        };
        Ok(ServiceTimeExpr { anchor, offset })
    }
}

impl TryFrom<String> for ServiceTimeExpr {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ServiceTimeExpr> for String {
    fn from(e: ServiceTimeExpr) -> String {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Time {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(t("05:30"), Time(330));
        assert_eq!(t("00:00"), Time(0));
        assert_eq!(t("23:59"), Time(1439));
        assert_eq!(t("09:05").to_string(), "09:05");
    }

    #[test]
    fn test_reject_bad_clock_time() {
        for s in ["24:00", "12:60", "1230", "ab:cd", "12:", ""] {
            assert!(s.parse::<Time>().is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_resolve_anchors() {
        let arrival = t("05:30");
        let departure = t("06:45");
        let resolve = |s: &str| s.parse::<ServiceTimeExpr>().unwrap().resolve(arrival, departure);

        assert_eq!(resolve("A"), t("05:30"));
        assert_eq!(resolve("D"), t("06:45"));
        assert_eq!(resolve("A+10"), t("05:40"));
        assert_eq!(resolve("A-10"), t("05:20"));
        assert_eq!(resolve("D-15"), t("06:30"));
        assert_eq!(resolve("D+5"), t("06:50"));
    }

    #[test]
    fn test_reject_malformed_exprs() {
        for s in ["", "X+5", "A*5", "A+", "A-", "A+-3", "A5", "arrival", "+5"] {
            let parsed = s.parse::<ServiceTimeExpr>();
            assert!(
                matches!(parsed, Err(Error::MalformedTimeExpr(_))),
                "accepted {:?}",
                s
            );
        }
    }

    #[test]
    fn test_expr_display_round_trip() {
        for s in ["A", "D", "A+10", "D-5"] {
            assert_eq!(s.parse::<ServiceTimeExpr>().unwrap().to_string(), s);
        }
    }
}
