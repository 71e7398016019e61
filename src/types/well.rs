//! Accepted well parameter types and well-type classification

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Well-type classification selecting the allocation branch for a well.
///
/// The source data stores the type as free text; tags are compared
/// case-insensitively and anything unrecognized is a plain producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WellClass {
    /// Gas-storage well ("GS") — net volume passes through allocation unchanged
    Gs,
    /// Gas-lift well ("GLW") — subject to gross-volume proportional redistribution
    Glw,
    /// Natural-flow well ("NF") — excluded from the GLW redistribution,
    /// keeps its ratio-allocated net volume as gross
    Nf,
    /// Any other tag — plain (LP) producer
    Plain,
}

impl WellClass {
    /// Classify a free-text well type tag.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(t) if t.eq_ignore_ascii_case("GS") => Self::Gs,
            Some(t) if t.eq_ignore_ascii_case("GLW") => Self::Glw,
            Some(t) if t.eq_ignore_ascii_case("NF") => Self::Nf,
            _ => Self::Plain,
        }
    }
}

/// One well's accepted test parameters for an allocation period.
///
/// Produced by the repository join of accepted parameters with well
/// metadata. The order of these rows is load-bearing: every per-well
/// output list of the allocation engine is positionally aligned to the
/// input list, so callers must not reorder between load and allocate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellParameterRow {
    pub well_id: i64,
    /// Display name from well metadata ("Unknown" when the join misses)
    pub well_name: String,
    /// Free-text well type tag ("GS", "GLW", "NF", or anything else)
    pub well_type: Option<String>,
    /// Producing days in the period (0 = well was down all period)
    pub days_on: i64,
    /// Average gas injection rate (Mm³/day)
    pub avg_qg_inj: f64,
    /// Gross gas rate from the accepted test (Mm³/day)
    pub qg_tot: f64,
    /// Date of the well test the parameters were accepted from
    #[serde(default)]
    pub test_date: Option<NaiveDate>,
}

impl WellParameterRow {
    /// Allocation branch this well takes.
    pub fn class(&self) -> WellClass {
        WellClass::from_tag(self.well_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_classify_case_insensitively() {
        assert_eq!(WellClass::from_tag(Some("GS")), WellClass::Gs);
        assert_eq!(WellClass::from_tag(Some("gs")), WellClass::Gs);
        assert_eq!(WellClass::from_tag(Some("Glw")), WellClass::Glw);
        assert_eq!(WellClass::from_tag(Some("nf")), WellClass::Nf);
    }

    #[test]
    fn unknown_or_missing_tags_are_plain() {
        assert_eq!(WellClass::from_tag(Some("HP")), WellClass::Plain);
        assert_eq!(WellClass::from_tag(Some("")), WellClass::Plain);
        assert_eq!(WellClass::from_tag(None), WellClass::Plain);
        // Whitespace is significant — the source tags are stored bare
        assert_eq!(WellClass::from_tag(Some(" GS")), WellClass::Plain);
    }
}
