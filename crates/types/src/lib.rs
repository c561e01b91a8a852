pub mod time;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub use time::{Hour, HourRange, TimeError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone,
            Debug,
            Serialize,
            Deserialize,
            ToSchema,
            JsonSchema,
            Eq,
            PartialEq,
            Ord,
            PartialOrd,
            Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(StudentId);
id_newtype!(CourseId);
id_newtype!(FacultyId);

/// Students in the order the caller listed them.
pub type Enrollment = IndexMap<StudentId, Vec<CourseId>>;
pub type Timetable = BTreeMap<SlotLabel, Vec<CourseId>>;
/// Faculty in the order the caller listed them; that order breaks ties
/// between available invigilators.
pub type FacultyAvailability = IndexMap<FacultyId, Vec<HourRange>>;
pub type ExamFacultySchedule = BTreeMap<SlotLabel, SlotInvigilation>;

/// One exam sitting within the generated grid. Day and slot are 1-based.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Ord, PartialOrd, Hash,
)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub day: u32,
    pub slot: u32,
    #[schema(value_type = f64)]
    pub start_time: Hour,
    #[schema(value_type = f64)]
    pub end_time: Hour,
}

impl TimeSlot {
    pub fn range(&self) -> HourRange {
        HourRange(self.start_time, self.end_time)
    }

    pub fn label(&self) -> SlotLabel {
        SlotLabel(*self)
    }
}

/// `"Day {n}, Slot {k} ({start}:00-{end}:00)"`. Orders chronologically.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SlotLabel(pub TimeSlot);

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day {}, Slot {} ({})",
            self.0.day,
            self.0.slot,
            self.0.range()
        )
    }
}

impl FromStr for SlotLabel {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TimeError::Label(s.to_string());
        let rest = s.strip_prefix("Day ").ok_or_else(bad)?;
        let (day, rest) = rest.split_once(", Slot ").ok_or_else(bad)?;
        let (slot, rest) = rest.split_once(" (").ok_or_else(bad)?;
        let range = rest.strip_suffix(')').ok_or_else(bad)?;
        let day: u32 = day.parse().map_err(|_| bad())?;
        let slot: u32 = slot.parse().map_err(|_| bad())?;
        if day == 0 || slot == 0 {
            return Err(bad());
        }
        let range: HourRange = range.parse()?;
        Ok(SlotLabel(TimeSlot {
            day,
            slot,
            start_time: range.start(),
            end_time: range.end(),
        }))
    }
}

impl Serialize for SlotLabel {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotLabel {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl JsonSchema for SlotLabel {
    fn schema_name() -> String {
        "SlotLabel".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

/// `"{start}:00-{end}:00"` key of one invigilation hour.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubSlotLabel(pub HourRange);

impl fmt::Display for SubSlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for SubSlotLabel {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SubSlotLabel {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map(SubSlotLabel).map_err(de::Error::custom)
    }
}

impl JsonSchema for SubSlotLabel {
    fn schema_name() -> String {
        "SubSlotLabel".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotGrid {
    #[schema(value_type = f64)]
    pub exam_duration: Hour,
    #[schema(value_type = f64)]
    pub break_duration: Hour,
    #[schema(value_type = f64)]
    pub day_start: Hour,
    #[schema(value_type = f64)]
    pub day_end: Hour,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            exam_duration: Hour::whole(3),
            break_duration: Hour::from_minutes(30),
            day_start: Hour::whole(9),
            day_end: Hour::whole(17),
        }
    }
}

impl SlotGrid {
    pub fn business_hours(&self) -> HourRange {
        HourRange(self.day_start, self.day_end)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ColoringOrder {
    #[default]
    ListOrder,
    LargestDegreeFirst,
}

impl fmt::Display for ColoringOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColoringOrder::ListOrder => f.write_str("listOrder"),
            ColoringOrder::LargestDegreeFirst => f.write_str("largestDegreeFirst"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub enrollment: Enrollment,
    pub course_list: Vec<CourseId>,
    pub days: u32,
    #[serde(default)]
    pub slots_per_day: Option<u32>,
    #[serde(default)]
    pub grid: SlotGrid,
    #[serde(default)]
    pub ordering: ColoringOrder,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetail {
    pub student: StudentId,
    pub slot_index: usize,
    pub courses: Vec<CourseId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub conflicts: u32,
    pub conflict_details: Vec<ConflictDetail>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExamSchedule {
    #[schema(value_type = Object)]
    pub timetable: Timetable,
    pub conflicts: u32,
    pub conflict_details: Vec<ConflictDetail>,
    pub overflow_count: u32,
    pub overflow_courses: Vec<CourseId>,
    pub slots: Vec<TimeSlot>,
    pub stats: serde_json::Value,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InvigilationPolicy {
    pub max_assignments_per_day: u32,
}

impl Default for InvigilationPolicy {
    fn default() -> Self {
        Self {
            max_assignments_per_day: 1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyRequest {
    #[schema(value_type = Object)]
    pub timetable: Timetable,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub faculty_availability: FacultyAvailability,
    pub exam_dates: Vec<String>,
    #[serde(default)]
    pub policy: InvigilationPolicy,
    #[serde(default)]
    pub grid: SlotGrid,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FacultyAssignment {
    pub faculty: FacultyId,
    #[schema(value_type = Vec<f64>)]
    pub hour_range: HourRange,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotInvigilation {
    pub courses: Vec<CourseId>,
    pub date: String,
    #[schema(value_type = Object)]
    pub sub_slot_assignments: BTreeMap<SubSlotLabel, Vec<FacultyAssignment>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UncoveredSubSlot {
    #[schema(value_type = String)]
    pub slot: SlotLabel,
    #[schema(value_type = String)]
    pub sub_slot: SubSlotLabel,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub enrollment: Enrollment,
    pub course_list: Vec<CourseId>,
    pub exam_dates: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub faculty_availability: FacultyAvailability,
    #[serde(default)]
    pub slots_per_day: Option<u32>,
    #[serde(default)]
    pub grid: SlotGrid,
    #[serde(default)]
    pub ordering: ColoringOrder,
    #[serde(default)]
    pub policy: InvigilationPolicy,
}

impl ScheduleRequest {
    pub fn exam_request(&self) -> ExamRequest {
        ExamRequest {
            enrollment: self.enrollment.clone(),
            course_list: self.course_list.clone(),
            days: u32::try_from(self.exam_dates.len()).unwrap_or(u32::MAX),
            slots_per_day: self.slots_per_day,
            grid: self.grid,
            ordering: self.ordering,
        }
    }

    pub fn faculty_request(&self, timetable: Timetable) -> FacultyRequest {
        FacultyRequest {
            timetable,
            faculty_availability: self.faculty_availability.clone(),
            exam_dates: self.exam_dates.clone(),
            policy: self.policy,
            grid: self.grid,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub exams: ExamSchedule,
    #[schema(value_type = Object)]
    pub invigilation: ExamFacultySchedule,
    pub uncovered: Vec<UncoveredSubSlot>,
    pub stats: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictsRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub enrollment: Enrollment,
    #[schema(value_type = Object)]
    pub timetable: Timetable,
    pub days: u32,
    #[serde(default)]
    pub grid: SlotGrid,
}
