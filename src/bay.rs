use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

pub type BayId = Arc<str>;

/// A parking position on the apron. `travel_time` maps other bay ids to the
/// minutes a staff member needs to walk or drive between the two stands.
#[derive(Debug, Clone, Deserialize)]
pub struct Bay {
    pub number: BayId,
    #[serde(default)]
    pub travel_time: HashMap<BayId, i32>,
}

/// Dense bay-pair travel lookup. Travel from a bay to itself is 0; pairs the
/// input leaves out fall back to the configured default.
#[derive(Debug, Clone)]
pub struct TravelTimes {
    minutes: HashMap<(BayId, BayId), i32>,
    default: i32,
}

impl TravelTimes {
    pub fn build(bays: &[Bay], default: i32) -> Self {
        let mut minutes = HashMap::new();
        for from in bays {
            for to in bays {
                let value = if from.number == to.number {
                    0
                } else {
                    from.travel_time.get(&to.number).copied().unwrap_or(default)
                };
                minutes.insert((from.number.clone(), to.number.clone()), value);
            }
        }
        TravelTimes { minutes, default }
    }

    pub fn between(&self, from: &BayId, to: &BayId) -> i32 {
        self.minutes
            .get(&(from.clone(), to.clone()))
            .copied()
            .unwrap_or(self.default)
    }
}
