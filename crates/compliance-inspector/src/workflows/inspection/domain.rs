use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Inspected attribute of a property. `ordered()` defines display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChecklistField {
    Roof,
    Gutters,
    Siding,
    ExteriorPaint,
    Windows,
    Doors,
    Foundation,
    Chimney,
    PorchDeck,
    StepsRailings,
    Walkways,
    Driveway,
    Fencing,
    Landscaping,
    Lawn,
    Debris,
    TrashReceptacles,
    InoperableVehicles,
    OutdoorStorage,
    Signage,
    ExteriorLighting,
    HouseNumbers,
    Garage,
    AccessoryStructures,
}

impl ChecklistField {
    pub const COUNT: usize = 24;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Roof,
            Self::Gutters,
            Self::Siding,
            Self::ExteriorPaint,
            Self::Windows,
            Self::Doors,
            Self::Foundation,
            Self::Chimney,
            Self::PorchDeck,
            Self::StepsRailings,
            Self::Walkways,
            Self::Driveway,
            Self::Fencing,
            Self::Landscaping,
            Self::Lawn,
            Self::Debris,
            Self::TrashReceptacles,
            Self::InoperableVehicles,
            Self::OutdoorStorage,
            Self::Signage,
            Self::ExteriorLighting,
            Self::HouseNumbers,
            Self::Garage,
            Self::AccessoryStructures,
        ]
    }

    /// Key used by the record store and CSV exports.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Roof => "roof",
            Self::Gutters => "gutters",
            Self::Siding => "siding",
            Self::ExteriorPaint => "exteriorPaint",
            Self::Windows => "windows",
            Self::Doors => "doors",
            Self::Foundation => "foundation",
            Self::Chimney => "chimney",
            Self::PorchDeck => "porchDeck",
            Self::StepsRailings => "stepsRailings",
            Self::Walkways => "walkways",
            Self::Driveway => "driveway",
            Self::Fencing => "fencing",
            Self::Landscaping => "landscaping",
            Self::Lawn => "lawn",
            Self::Debris => "debris",
            Self::TrashReceptacles => "trashReceptacles",
            Self::InoperableVehicles => "inoperableVehicles",
            Self::OutdoorStorage => "outdoorStorage",
            Self::Signage => "signage",
            Self::ExteriorLighting => "exteriorLighting",
            Self::HouseNumbers => "houseNumbers",
            Self::Garage => "garage",
            Self::AccessoryStructures => "accessoryStructures",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Roof => "Roof",
            Self::Gutters => "Gutters & Downspouts",
            Self::Siding => "Siding",
            Self::ExteriorPaint => "Exterior Paint",
            Self::Windows => "Windows & Screens",
            Self::Doors => "Exterior Doors",
            Self::Foundation => "Foundation",
            Self::Chimney => "Chimney",
            Self::PorchDeck => "Porch / Deck",
            Self::StepsRailings => "Steps & Railings",
            Self::Walkways => "Walkways",
            Self::Driveway => "Driveway",
            Self::Fencing => "Fencing",
            Self::Landscaping => "Landscaping",
            Self::Lawn => "Lawn Maintenance",
            Self::Debris => "Trash & Debris",
            Self::TrashReceptacles => "Trash Receptacles",
            Self::InoperableVehicles => "Inoperable Vehicles",
            Self::OutdoorStorage => "Outdoor Storage",
            Self::Signage => "Signage",
            Self::ExteriorLighting => "Exterior Lighting",
            Self::HouseNumbers => "House Numbers",
            Self::Garage => "Garage",
            Self::AccessoryStructures => "Accessory Structures",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|field| field.key() == key.trim())
    }
}

/// Condition recorded for one checklist field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistValue {
    Accept,
    Minor,
    Major,
    NotApplicable,
    /// Token outside the four known values, kept verbatim.
    Unrecognized(String),
}

impl ChecklistValue {
    /// Returns `None` for blank input so unset fields stay unset. Tokens
    /// match exactly; `Accept` or `MAJOR` stay unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let value = match trimmed {
            "accept" => Self::Accept,
            "minor" => Self::Minor,
            "major" => Self::Major,
            "na" => Self::NotApplicable,
            _ => Self::Unrecognized(trimmed.to_string()),
        };
        Some(value)
    }

    pub fn token(&self) -> &str {
        match self {
            Self::Accept => "accept",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::NotApplicable => "na",
            Self::Unrecognized(raw) => raw,
        }
    }
}

/// Checklist values keyed by field; unset fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checklist {
    values: HashMap<ChecklistField, ChecklistValue>,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: ChecklistField) -> Option<&ChecklistValue> {
        self.values.get(&field)
    }

    pub fn set(&mut self, field: ChecklistField, value: ChecklistValue) {
        self.values.insert(field, value);
    }

    pub fn with(mut self, field: ChecklistField, value: ChecklistValue) -> Self {
        self.set(field, value);
        self
    }

    /// Every field marked `accept`.
    pub fn all_accepted() -> Self {
        ChecklistField::ordered()
            .into_iter()
            .fold(Self::new(), |checklist, field| {
                checklist.with(field, ChecklistValue::Accept)
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Checklist {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ordered: BTreeMap<&'static str, &str> = ChecklistField::ordered()
            .into_iter()
            .filter_map(|field| {
                self.values
                    .get(&field)
                    .map(|value| (field.key(), value.token()))
            })
            .collect();
        ordered.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Checklist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Option<String>>::deserialize(deserializer)?;
        let mut checklist = Checklist::new();
        for (key, value) in raw {
            let Some(field) = ChecklistField::from_key(&key) else {
                continue;
            };
            if let Some(value) = value.as_deref().and_then(ChecklistValue::parse) {
                checklist.set(field, value);
            }
        }
        Ok(checklist)
    }
}

/// Follow-up state recorded after an inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplianceStatus {
    Resolved,
    InProgress,
    FurtherAction,
    Unrecognized(String),
}

impl ComplianceStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let status = match trimmed.to_ascii_lowercase().as_str() {
            "resolved" => Self::Resolved,
            "in-progress" => Self::InProgress,
            "further-action" => Self::FurtherAction,
            _ => Self::Unrecognized(trimmed.to_string()),
        };
        Some(status)
    }

    pub fn token(&self) -> &str {
        match self {
            Self::Resolved => "resolved",
            Self::InProgress => "in-progress",
            Self::FurtherAction => "further-action",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Resolved => "Resolved",
            Self::InProgress => "In Progress",
            Self::FurtherAction => "Further Action Required",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl Serialize for ComplianceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for ComplianceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ComplianceStatus::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom("compliance status must not be blank"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    #[serde(default, deserialize_with = "null_as_false")]
    pub violation_notice_sent: bool,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub notice_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub compliance_deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub reinspection_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_status_as_none")]
    pub compliance_status: Option<ComplianceStatus>,
}

/// One property-visit submission as stored by the record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub property_address: Option<String>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub review_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub review_team: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub submitted_by: Option<String>,
    #[serde(default, deserialize_with = "blank_timestamp_as_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checklist: Checklist,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub comments: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub follow_up: FollowUp,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Accepts RFC 3339 or `YYYY-MM-DD`; date-only values are midnight UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar date as written; an RFC 3339 value keeps its own offset's date.
pub(crate) fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_calendar_date(raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'"))),
    }
}

fn blank_timestamp_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn blank_status_as_none<'de, D>(deserializer: D) -> Result<Option<ComplianceStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(ComplianceStatus::parse))
}
