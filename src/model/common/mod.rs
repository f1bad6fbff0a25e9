mod decision;
mod ids;
mod location;

pub use decision::DecisionValue;
pub use ids::{ballot_id, new_id};
pub use location::{check_optional_state, is_pilot_state, StateCode, Zipcode, PILOT_STATES};
