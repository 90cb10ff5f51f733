//! Cascading filter engine.
//!
//! A pipeline is an ordered list of [`Stage`]s, each narrowing the frame by
//! one column. Stages are conjunctive and applied left to right; the option
//! set offered for stage *i* is enumerated from the frame already narrowed by
//! stages 1..i-1, never from the unfiltered universe. The input frame is
//! never mutated; every stage produces a new frame.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::InsightError;
use crate::schema::{Field, FieldKind};

/// Selection predicate for a single stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Set membership: the accepted values for a categorical column.
    /// An empty set accepts nothing.
    AnyOf(Vec<String>),
    /// Inclusive numeric range. `low > high` accepts nothing; bounds are
    /// deliberately not swapped.
    Between { low: f64, high: f64 },
}

/// One filter step: a field plus an optional predicate.
///
/// A stage without a predicate keeps every row (the "all values selected"
/// default) but still contributes its option set to the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    field: Field,
    predicate: Option<Predicate>,
}

impl Stage {
    /// Pass-through stage: enumerate options, filter nothing.
    pub fn keep_all(field: Field) -> Self {
        Self {
            field,
            predicate: None,
        }
    }

    /// Set-membership stage. Rejected for numeric fields.
    pub fn any_of(field: Field, values: Vec<String>) -> Result<Self, InsightError> {
        if field.kind() != FieldKind::Categorical {
            return Err(InsightError::InvalidField {
                field: field.name(),
                reason: "set predicate requires a categorical field".into(),
            });
        }
        Ok(Self {
            field,
            predicate: Some(Predicate::AnyOf(values)),
        })
    }

    /// Inclusive-range stage. Rejected for categorical fields.
    pub fn between(field: Field, low: f64, high: f64) -> Result<Self, InsightError> {
        if field.kind() != FieldKind::Numeric {
            return Err(InsightError::InvalidField {
                field: field.name(),
                reason: "range predicate requires a numeric field".into(),
            });
        }
        Ok(Self {
            field,
            predicate: Some(Predicate::Between { low, high }),
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }
}

/// Valid selections for a stage, derived from the upstream-filtered frame.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSet {
    /// Distinct non-null values, sorted. Empty upstream → empty set.
    Values(Vec<String>),
    /// Min/max of the column. `None` when the upstream frame is empty or the
    /// column is all null.
    Range(Option<(f64, f64)>),
}

/// Per-stage result: the options offered and the frame after the predicate.
#[derive(Debug, Clone)]
pub struct StageView {
    pub field: Field,
    pub options: OptionSet,
    pub frame: DataFrame,
}

/// Full pipeline result: per-stage views plus the final filtered frame.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub stages: Vec<StageView>,
    pub filtered: DataFrame,
}

/// Apply the stages left to right to `data`.
///
/// Every stage's column must exist in the frame; a missing column is an
/// error, an empty frame is not. Identical inputs always yield identical
/// outputs.
pub fn apply_stages(data: &DataFrame, stages: &[Stage]) -> Result<FilterOutcome, InsightError> {
    let mut current = data.clone();
    let mut views = Vec::with_capacity(stages.len());

    for stage in stages {
        let name = stage.field.name();
        if current.column(name).is_err() {
            return Err(InsightError::MissingColumn(name.to_string()));
        }

        let options = enumerate_options(&current, stage.field)?;
        let next = apply_predicate(&current, stage)?;

        views.push(StageView {
            field: stage.field,
            options,
            frame: next.clone(),
        });
        current = next;
    }

    Ok(FilterOutcome {
        stages: views,
        filtered: current,
    })
}

/// Enumerate the valid selections for `field` within `df`.
///
/// Nulls never appear in the result; an empty frame yields an empty option
/// set rather than an error.
pub fn enumerate_options(df: &DataFrame, field: Field) -> Result<OptionSet, InsightError> {
    let name = field.name();
    match field.kind() {
        FieldKind::Categorical => {
            let values_col = df.column(name)?.str()?;
            let mut values: Vec<String> = values_col
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect();
            values.sort();
            values.dedup();
            Ok(OptionSet::Values(values))
        }
        FieldKind::Numeric => {
            let s = df.column(name)?.as_materialized_series();
            let min = s
                .min_reduce()?
                .value()
                .try_extract::<f64>()
                .ok()
                .filter(|v| !v.is_nan());
            let max = s
                .max_reduce()?
                .value()
                .try_extract::<f64>()
                .ok()
                .filter(|v| !v.is_nan());
            Ok(OptionSet::Range(match (min, max) {
                (Some(lo), Some(hi)) => Some((lo, hi)),
                _ => None,
            }))
        }
    }
}

fn apply_predicate(df: &DataFrame, stage: &Stage) -> Result<DataFrame, InsightError> {
    let name = stage.field.name();
    let filtered = match &stage.predicate {
        None => df.clone(),
        Some(Predicate::AnyOf(values)) => {
            let accepted = Series::new("".into(), values.clone());
            df.clone()
                .lazy()
                .filter(col(name).is_in(lit(accepted), false))
                .collect()?
        }
        Some(Predicate::Between { low, high }) => df
            .clone()
            .lazy()
            .filter(col(name).gt_eq(lit(*low)).and(col(name).lt_eq(lit(*high))))
            .collect()?,
    };
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df!(
            "country" => ["Spain", "Spain", "France", "Brazil"],
            "room_type" => ["Entire home/apt", "Private room", "Entire home/apt", "Shared room"],
            "price" => [100.0, 150.0, 200.0, 80.0],
        )
        .unwrap()
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let stages = [Stage::between(Field::Price, 100.0, 200.0).unwrap()];
        let out = apply_stages(&sample(), &stages).unwrap();
        assert_eq!(out.filtered.height(), 3);
    }

    #[test]
    fn inverted_range_yields_empty() {
        let stages = [Stage::between(Field::Price, 200.0, 100.0).unwrap()];
        let out = apply_stages(&sample(), &stages).unwrap();
        assert_eq!(out.filtered.height(), 0);
    }

    #[test]
    fn empty_selection_yields_empty_and_downstream_tolerates_it() {
        let stages = [
            Stage::any_of(Field::Country, vec![]).unwrap(),
            Stage::keep_all(Field::RoomType),
            Stage::between(Field::Price, 0.0, 1000.0).unwrap(),
        ];
        let out = apply_stages(&sample(), &stages).unwrap();
        assert_eq!(out.filtered.height(), 0);
        assert_eq!(out.stages[1].options, OptionSet::Values(vec![]));
        assert_eq!(out.stages[2].options, OptionSet::Range(None));
    }

    #[test]
    fn options_come_from_upstream_filtered_frame() {
        let stages = [
            Stage::any_of(Field::Country, vec!["Spain".into()]).unwrap(),
            Stage::keep_all(Field::RoomType),
        ];
        let out = apply_stages(&sample(), &stages).unwrap();
        assert_eq!(
            out.stages[1].options,
            OptionSet::Values(vec!["Entire home/apt".into(), "Private room".into()])
        );
    }

    #[test]
    fn predicate_kind_checked_at_construction() {
        assert!(Stage::any_of(Field::Price, vec!["x".into()]).is_err());
        assert!(Stage::between(Field::Country, 0.0, 1.0).is_err());
    }

    #[test]
    fn missing_column_is_an_error() {
        let df = df!("price" => [1.0]).unwrap();
        let err = apply_stages(&df, &[Stage::keep_all(Field::Country)]).unwrap_err();
        assert!(matches!(err, InsightError::MissingColumn(_)));
    }
}
