use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::Error;

/// States covered by the pilot. Every endpoint accepting a state or ZIP code
/// enforces this list.
pub const PILOT_STATES: [&str; 5] = ["NY", "NJ", "PA", "CT", "TX"];

/// Is the given two-letter state code part of the pilot?
pub fn is_pilot_state(state: &str) -> bool {
    PILOT_STATES.contains(&state)
}

/// A syntactically valid ZIP code: exactly five ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zipcode(String);

impl Zipcode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Zipcode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 5 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::bad_request(format!(
                "ZIP code must be exactly 5 digits, got '{s}'"
            )))
        }
    }
}

impl Display for Zipcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A syntactically valid state code: exactly two uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateCode(String);

impl StateCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reject states outside the pilot.
    pub fn require_pilot(self) -> Result<Self, Error> {
        if is_pilot_state(&self.0) {
            Ok(self)
        } else {
            Err(Error::unsupported_state(self.0))
        }
    }
}

impl FromStr for StateCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 2 && s.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::bad_request(format!(
                "State must be a two-letter uppercase code, got '{s}'"
            )))
        }
    }
}

impl Display for StateCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate an optional state field from a request body.
pub fn check_optional_state(state: Option<&str>) -> Result<(), Error> {
    if let Some(state) = state {
        state.parse::<StateCode>()?.require_pilot()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zipcodes() {
        assert!("10001".parse::<Zipcode>().is_ok());
        assert!("00000".parse::<Zipcode>().is_ok());
        for bad in ["", "1000", "100011", "1000a", " 10001", "1O001", "１0001"] {
            assert!(
                matches!(bad.parse::<Zipcode>(), Err(Error::BadRequest(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn state_codes() {
        assert_eq!("NY".parse::<StateCode>().unwrap().as_str(), "NY");
        assert!("ny".parse::<StateCode>().is_err());
        assert!("NYC".parse::<StateCode>().is_err());
        assert!("N1".parse::<StateCode>().is_err());

        assert!("TX".parse::<StateCode>().unwrap().require_pilot().is_ok());
        let err = "CA".parse::<StateCode>().unwrap().require_pilot().unwrap_err();
        assert!(matches!(err, Error::Unsupported { ref state, .. } if state == "CA"));
    }

    #[test]
    fn optional_state() {
        assert!(check_optional_state(None).is_ok());
        assert!(check_optional_state(Some("CT")).is_ok());
        assert!(matches!(
            check_optional_state(Some("OR")),
            Err(Error::Unsupported { .. })
        ));
        assert!(matches!(
            check_optional_state(Some("oregon")),
            Err(Error::BadRequest(_))
        ));
    }
}
