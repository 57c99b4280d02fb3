use crate::{errors::Error, Result};

const SOLDIERS: &[&str] = &[
    "a young infantryman",
    "a grizzled sergeant",
    "a combat medic",
    "a paratrooper",
    "a radio operator",
    "a machine gunner",
    "a sniper in a ghillie suit",
    "a tank commander",
    "a military engineer",
    "a scout",
];

const INJURIES: &[&str] = &[
    "a bandaged head wound",
    "a bloodied arm in a makeshift sling",
    "a shrapnel-torn leg",
    "burns across one forearm",
    "a splinted ankle",
    "a gauze-wrapped hand",
    "a deep cut above the eye",
    "a tourniquet on the thigh",
];

const ACTIONS: &[&str] = &[
    "crouching behind sandbags",
    "advancing through the smoke",
    "resting against a shattered wall",
    "scanning the horizon",
    "reloading their rifles",
    "dragging a supply crate",
    "waiting for evacuation",
    "sharing a canteen",
];

const ENVIRONMENTS: &[&str] = &[
    "a muddy trench",
    "a bombed-out village",
    "a dense pine forest",
    "a desert outpost",
    "a rain-soaked field",
    "a ruined cathedral",
    "a mountain pass",
    "a burned farmhouse",
];

const TIMES_OF_DAY: &[&str] = &[
    "at dawn",
    "at dusk",
    "under the noon sun",
    "in the dead of night",
    "in the late afternoon",
    "at first light",
];

const WEATHER: &[&str] = &[
    "heavy rain falling",
    "fog drifting low",
    "clear skies overhead",
    "snow falling softly",
    "a dust storm rolling in",
    "thunderclouds gathering",
];

const CAMERA: &[&str] = &[
    "Wide-angle shot",
    "Close-up portrait",
    "Over-the-shoulder view",
    "Low-angle shot",
    "Handheld documentary frame",
    "Telephoto shot",
];

/// Fragment lists the generator draws from, one per template slot.
#[derive(Clone, Copy, Debug)]
pub struct Vocabulary {
    pub soldiers: &'static [&'static str],
    pub injuries: &'static [&'static str],
    pub actions: &'static [&'static str],
    pub environments: &'static [&'static str],
    pub times_of_day: &'static [&'static str],
    pub weather: &'static [&'static str],
    pub camera: &'static [&'static str],
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            soldiers: SOLDIERS,
            injuries: INJURIES,
            actions: ACTIONS,
            environments: ENVIRONMENTS,
            times_of_day: TIMES_OF_DAY,
            weather: WEATHER,
            camera: CAMERA,
        }
    }
}

impl Vocabulary {
    fn lists(&self) -> [(&'static str, &'static [&'static str]); 7] {
        [
            ("soldiers", self.soldiers),
            ("injuries", self.injuries),
            ("actions", self.actions),
            ("environments", self.environments),
            ("times_of_day", self.times_of_day),
            ("weather", self.weather),
            ("camera", self.camera),
        ]
    }

    /// Every list must have at least one fragment.
    pub fn validate(&self) -> Result<()> {
        for (name, list) in self.lists() {
            if list.is_empty() {
                return Err(Error::Config(format!(
                    "prompt vocabulary `{name}` must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_is_valid() {
        Vocabulary::default().validate().unwrap();
    }

    #[test]
    fn empty_list_is_named_in_error() {
        let vocab = Vocabulary {
            weather: &[],
            ..Vocabulary::default()
        };
        let err = vocab.validate().unwrap_err().to_string();
        assert!(err.contains("weather"), "{err}");
    }

    #[test]
    fn fragments_carry_no_template_braces() {
        for (_, list) in Vocabulary::default().lists() {
            for frag in list {
                assert!(!frag.contains('{') && !frag.contains('}'), "{frag}");
            }
        }
    }
}
