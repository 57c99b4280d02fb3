//! `{slot}` templates for prompt text.
//!
//! Templates are parsed once when the generator is built, so an unknown or
//! unterminated placeholder fails at startup and rendering cannot fail later.

use crate::{errors::Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Camera,
    Actors,
    Action,
    Environment,
    TimeOfDay,
    Weather,
    InjuredCount,
    ActorCount,
}

impl Slot {
    const ALL: [Slot; 8] = [
        Slot::Camera,
        Slot::Actors,
        Slot::Action,
        Slot::Environment,
        Slot::TimeOfDay,
        Slot::Weather,
        Slot::InjuredCount,
        Slot::ActorCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Slot::Camera => "camera",
            Slot::Actors => "actors",
            Slot::Action => "action",
            Slot::Environment => "environment",
            Slot::TimeOfDay => "time_of_day",
            Slot::Weather => "weather",
            Slot::InjuredCount => "injured_count",
            Slot::ActorCount => "actor_count",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Values for one rendering pass.
#[derive(Clone, Debug, Default)]
pub struct SlotValues {
    pub camera: String,
    pub actors: String,
    pub action: String,
    pub environment: String,
    pub time_of_day: String,
    pub weather: String,
    pub injured_count: usize,
    pub actor_count: usize,
}

impl SlotValues {
    fn write(&self, slot: Slot, out: &mut String) {
        match slot {
            Slot::Camera => out.push_str(&self.camera),
            Slot::Actors => out.push_str(&self.actors),
            Slot::Action => out.push_str(&self.action),
            Slot::Environment => out.push_str(&self.environment),
            Slot::TimeOfDay => out.push_str(&self.time_of_day),
            Slot::Weather => out.push_str(&self.weather),
            Slot::InjuredCount => out.push_str(&self.injured_count.to_string()),
            Slot::ActorCount => out.push_str(&self.actor_count.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

#[derive(Clone, Debug)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = src;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                return Err(Error::Config(format!(
                    "unterminated placeholder in template {src:?}"
                )));
            };
            let name = &after[..close];
            let slot = Slot::from_name(name).ok_or_else(|| {
                Error::Config(format!("unknown placeholder {{{name}}} in template {src:?}"))
            })?;
            segments.push(Segment::Slot(slot));
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(Error::Config(format!(
                "stray closing brace in template {src:?}"
            )));
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn render(&self, values: &SlotValues) -> String {
        let mut out = String::with_capacity(160);
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Slot(s) => values.write(*s, &mut out),
            }
        }
        out
    }

    #[cfg(test)]
    fn slots(&self) -> Vec<Slot> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(slot) => Some(*slot),
                Segment::Text(_) => None,
            })
            .collect()
    }
}

/// Join clauses the way a sentence would: `a`, `a and b`, `a, b and c`.
pub fn join_natural<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{head} and {}", last.as_ref())
        }
    }
}
