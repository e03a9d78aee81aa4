use gpui::{AbsoluteLength, DefiniteLength, Pixels, SharedString, px, rems};
use serde::{Deserialize, Deserializer, de::Error};
use smallvec::SmallVec;

use crate::ThemeVariant;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrFloat {
    String(String),
    Float(f32),
}

/// A length parsed from `"12px"`, `"1.5rem"`, `"120%"` or a bare number (pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    Px(f32),
    Rem(f32),
    Percent(f32),
}

impl Unit {
    fn parse(value: StringOrFloat) -> Option<Self> {
        let string = match value {
            StringOrFloat::Float(num) => return Some(Unit::Px(num)),
            StringOrFloat::String(string) => string,
        };
        let string = string.trim();

        if let Some(num) = string.strip_suffix("rem") {
            return num.trim().parse().ok().map(Unit::Rem);
        }
        if let Some(num) = string.strip_suffix("px") {
            return num.trim().parse().ok().map(Unit::Px);
        }
        if let Some(num) = string.strip_suffix('%') {
            return num.trim().parse().ok().map(Unit::Percent);
        }

        None
    }
}

fn de_unit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Unit>, D::Error> {
    Ok(Unit::parse(StringOrFloat::deserialize(deserializer)?))
}

pub fn de_string_or_non_empty_list<'de, D>(
    deserializer: D,
) -> Result<SmallVec<[SharedString; 1]>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        One(SharedString),
        Many(SmallVec<[SharedString; 1]>),
    }

    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::One(string) => Ok(SmallVec::from_buf([string])),
        StringOrVec::Many(list) if list.is_empty() => Err(D::Error::custom("list can't be empty.")),
        StringOrVec::Many(list) => Ok(list),
    }
}

pub fn de_variants<'de, D>(deserializer: D) -> Result<SmallVec<[ThemeVariant; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let variants = SmallVec::<[ThemeVariant; 2]>::deserialize(deserializer)?;

    if variants.is_empty() {
        return Err(D::Error::custom(
            "at least one theme variant needs to be provided.",
        ));
    }

    Ok(variants)
}

pub fn de_pixels<'de, D>(deserializer: D) -> Result<Pixels, D::Error>
where
    D: Deserializer<'de>,
{
    match de_unit(deserializer)? {
        Some(Unit::Px(value)) => Ok(px(value)),
        _ => Err(D::Error::custom("expected f32 or string ending with 'px'")),
    }
}

pub fn de_abs_length<'de, D>(deserializer: D) -> Result<AbsoluteLength, D::Error>
where
    D: Deserializer<'de>,
{
    match de_unit(deserializer)? {
        Some(Unit::Px(value)) => Ok(AbsoluteLength::Pixels(px(value))),
        Some(Unit::Rem(value)) => Ok(AbsoluteLength::Rems(rems(value))),
        _ => Err(D::Error::custom(
            "expected f32 or string containing a f32 ending with 'rem' or 'px'",
        )),
    }
}

pub fn de_def_length<'de, D>(deserializer: D) -> Result<DefiniteLength, D::Error>
where
    D: Deserializer<'de>,
{
    match de_unit(deserializer)? {
        Some(Unit::Px(value)) => Ok(DefiniteLength::Absolute(AbsoluteLength::Pixels(px(value)))),
        Some(Unit::Rem(value)) => Ok(DefiniteLength::Absolute(AbsoluteLength::Rems(rems(value)))),
        Some(Unit::Percent(value)) => Ok(DefiniteLength::Fraction(value / 100.)),
        None => Err(D::Error::custom(
            "expected f32 or string containing a f32 ending with '%', 'rem' or 'px'",
        )),
    }
}
