use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::directory::domain::YouthCategory;

/// One roster row after normalization. `email` is `None` when the cell was
/// empty or not email-shaped.
#[derive(Debug)]
pub(crate) struct RosterRow {
    pub(crate) email: Option<String>,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) category: Option<YouthCategory>,
    pub(crate) country: Option<String>,
    pub(crate) camp: Option<String>,
    pub(crate) community: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RawRow>() {
        let raw = record?;
        rows.push(RosterRow {
            email: raw.email.as_deref().and_then(normalize_email),
            first_name: raw.first_name,
            last_name: raw.last_name,
            category: raw.category.as_deref().and_then(YouthCategory::parse),
            country: raw.country,
            camp: raw.camp,
            community: raw.community,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(
        rename = "First Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    first_name: Option<String>,
    #[serde(
        rename = "Last Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    last_name: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(rename = "Country", default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
    #[serde(rename = "Camp", default, deserialize_with = "empty_string_as_none")]
    camp: Option<String>,
    #[serde(
        rename = "Community",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    community: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_ascii_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Some(email),
        _ => None,
    }
}
