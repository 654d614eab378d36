//! Anchor token parsing and validation.
//!
//! Accepted forms (entity prefix optional via [`AnchorParser::parse_for`]):
//! - `12@age:30`
//! - `12@year:1985`
//! - `12@phase:teen`, `12@phase:future_self/age:30`
//! - `12@offset:+5`, `12@offset_years:-3/coronation`

use std::sync::LazyLock;

use lore_core::config::TemporalConfig;
use lore_core::errors::TemporalError;
use lore_core::models::{LifePhase, RelativeMarker, TemporalAnchor, TemporalInstance};
use lore_core::EntityId;
use regex::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)@([a-z_]+):(.+)$").expect("static regex"));

static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z_]+):(.+)$").expect("static regex"));

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("static regex"));

/// Validates anchors against the configured plausibility bounds.
#[derive(Debug, Clone)]
pub struct AnchorParser {
    max_age: u32,
    min_year: i32,
    max_year: i32,
    lifespan_years: u32,
}

impl AnchorParser {
    pub fn new(config: &TemporalConfig) -> Self {
        Self {
            max_age: config.max_age,
            min_year: config.min_year,
            max_year: config.max_year,
            lifespan_years: config.lifespan_years,
        }
    }

    /// Parse a full `<entityId>@<kind>:<value>` token.
    pub fn parse(&self, token: &str) -> Result<TemporalInstance, TemporalError> {
        let token = token.trim();
        let Some(caps) = TOKEN_RE.captures(token) else {
            let has_entity = token
                .split_once('@')
                .is_some_and(|(id, _)| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()));
            return Err(if has_entity || !(token.contains('@') || BARE_RE.is_match(token)) {
                TemporalError::Malformed {
                    token: token.to_string(),
                }
            } else {
                TemporalError::MissingEntity {
                    token: token.to_string(),
                }
            });
        };
        let entity: u64 = caps[1].parse().map_err(|_| TemporalError::MissingEntity {
            token: token.to_string(),
        })?;
        self.build(EntityId(entity), &caps[2], &caps[3])
    }

    /// Parse a bare `<kind>:<value>` anchor for an entity known from context.
    pub fn parse_for(&self, entity: EntityId, bare: &str) -> Result<TemporalInstance, TemporalError> {
        let bare = bare.trim();
        let caps = BARE_RE.captures(bare).ok_or_else(|| TemporalError::Malformed {
            token: bare.to_string(),
        })?;
        self.build(entity, &caps[1], &caps[2])
    }

    fn build(&self, entity: EntityId, kind: &str, value: &str) -> Result<TemporalInstance, TemporalError> {
        let anchor = self.parse_anchor(kind, value.trim())?;
        let low_confidence = match &anchor {
            TemporalAnchor::Offset { years, .. } => years.unsigned_abs() > u64::from(self.lifespan_years),
            _ => false,
        };
        Ok(TemporalInstance {
            entity,
            anchor,
            low_confidence,
        })
    }

    fn parse_anchor(&self, kind: &str, value: &str) -> Result<TemporalAnchor, TemporalError> {
        match kind {
            "age" => self.parse_age(value).map(TemporalAnchor::Age),
            "year" => self.parse_year(value).map(TemporalAnchor::Year),
            "phase" => self.parse_phase(value),
            "offset" | "offset_years" => parse_offset(value),
            other => Err(TemporalError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }

    fn parse_age(&self, value: &str) -> Result<u32, TemporalError> {
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("age", value));
        }
        let age: u32 = value.parse().map_err(|_| invalid("age", value))?;
        if age > self.max_age {
            return Err(TemporalError::OutOfRange {
                kind: "age".into(),
                value: i64::from(age),
                min: 0,
                max: i64::from(self.max_age),
            });
        }
        Ok(age)
    }

    fn parse_year(&self, value: &str) -> Result<i32, TemporalError> {
        if !YEAR_RE.is_match(value) {
            return Err(invalid("year", value));
        }
        let year: i32 = value.parse().map_err(|_| invalid("year", value))?;
        if year < self.min_year || year > self.max_year {
            return Err(TemporalError::OutOfRange {
                kind: "year".into(),
                value: i64::from(year),
                min: i64::from(self.min_year),
                max: i64::from(self.max_year),
            });
        }
        Ok(year)
    }

    fn parse_phase(&self, value: &str) -> Result<TemporalAnchor, TemporalError> {
        let (name, reference) = match value.split_once('/') {
            Some((name, reference)) => (name, Some(reference)),
            None => (value, None),
        };
        let marker = match name {
            "future_self" => RelativeMarker::FutureSelf,
            "past_self" => RelativeMarker::PastSelf,
            _ => {
                if reference.is_some() {
                    return Err(invalid("phase", value));
                }
                return name
                    .parse::<LifePhase>()
                    .map(TemporalAnchor::Phase)
                    .map_err(|_| TemporalError::UnknownPhase {
                        value: name.to_string(),
                    });
            }
        };
        let reference = match reference {
            None => None,
            Some(raw) => {
                let caps = BARE_RE.captures(raw).ok_or_else(|| invalid("phase", value))?;
                let inner = self.parse_anchor(&caps[1], &caps[2])?;
                // A reference must itself be orderable without another reference.
                if matches!(inner, TemporalAnchor::Relative { .. }) {
                    return Err(invalid("phase", value));
                }
                Some(Box::new(inner))
            }
        };
        Ok(TemporalAnchor::Relative { marker, reference })
    }
}

fn parse_offset(value: &str) -> Result<TemporalAnchor, TemporalError> {
    let (amount, reference) = match value.split_once('/') {
        Some((amount, reference)) => (amount, Some(reference.trim())),
        None => (value, None),
    };
    if reference.is_some_and(str::is_empty) {
        return Err(invalid("offset", value));
    }
    let digits = amount.strip_prefix(['+', '-']).unwrap_or(amount);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("offset", value));
    }
    let years: i64 = amount
        .strip_prefix('+')
        .unwrap_or(amount)
        .parse()
        .map_err(|_| invalid("offset", value))?;
    Ok(TemporalAnchor::Offset {
        years,
        reference: reference.map(str::to_string),
    })
}

fn invalid(kind: &str, value: &str) -> TemporalError {
    TemporalError::InvalidValue {
        kind: kind.to_string(),
        value: value.to_string(),
    }
}
