//! Group-by reductions and Top-N selection over a filtered frame.

use polars::prelude::*;

use crate::error::InsightError;
use crate::schema::{Field, FieldKind};

/// Declarative reduction specification.
///
/// Built by the caller, executed by [`aggregate`]. Reduced columns must be
/// numeric fields; nulls (including cells that failed the numeric cast at
/// load time) are skipped by the reduction rather than failing it.
#[derive(Debug, Clone)]
pub struct Aggregation {
    kind: AggKind,
}

#[derive(Debug, Clone)]
enum AggKind {
    Count {
        alias: String,
    },
    Sum {
        field: Field,
        alias: Option<String>,
    },
    Mean {
        field: Field,
        alias: Option<String>,
    },
}

impl Aggregation {
    /// Row count per group.
    pub fn count(alias: &str) -> Self {
        Self {
            kind: AggKind::Count {
                alias: alias.to_string(),
            },
        }
    }

    /// Sum of a numeric field. Output column defaults to `<name>_sum`.
    pub fn sum(field: Field, alias: Option<&str>) -> Result<Self, InsightError> {
        require_numeric(field)?;
        Ok(Self {
            kind: AggKind::Sum {
                field,
                alias: alias.map(str::to_string),
            },
        })
    }

    /// Mean of a numeric field. Output column defaults to `<name>_mean`.
    pub fn mean(field: Field, alias: Option<&str>) -> Result<Self, InsightError> {
        require_numeric(field)?;
        Ok(Self {
            kind: AggKind::Mean {
                field,
                alias: alias.map(str::to_string),
            },
        })
    }

    fn to_expr(&self) -> Expr {
        match &self.kind {
            AggKind::Count { alias } => len().alias(alias.clone()),
            AggKind::Sum { field, alias } => {
                let name = field.name();
                col(name)
                    .sum()
                    .alias(alias.clone().unwrap_or_else(|| format!("{name}_sum")))
            }
            AggKind::Mean { field, alias } => {
                let name = field.name();
                col(name)
                    .mean()
                    .alias(alias.clone().unwrap_or_else(|| format!("{name}_mean")))
            }
        }
    }
}

fn require_numeric(field: Field) -> Result<(), InsightError> {
    if field.kind() != FieldKind::Numeric {
        return Err(InsightError::InvalidField {
            field: field.name(),
            reason: "reduction requires a numeric field".into(),
        });
    }
    Ok(())
}

/// Group `df` by the given key fields and apply the reductions.
///
/// One output row per distinct key combination, ordered by first appearance
/// in `df` (stable group-by, so Top-N tie-breaking is deterministic). Rows
/// whose group key is null are dropped, never turned into a null group.
pub fn aggregate(
    df: &DataFrame,
    group_by: &[Field],
    aggregations: &[Aggregation],
) -> Result<DataFrame, InsightError> {
    if group_by.is_empty() {
        return Err(InsightError::Validation(
            "aggregate requires at least one group key".into(),
        ));
    }
    for field in group_by {
        if df.column(field.name()).is_err() {
            return Err(InsightError::MissingColumn(field.name().to_string()));
        }
    }

    let mut non_null = col(group_by[0].name()).is_not_null();
    for field in &group_by[1..] {
        non_null = non_null.and(col(field.name()).is_not_null());
    }

    let keys: Vec<Expr> = group_by.iter().map(|f| col(f.name())).collect();
    let exprs: Vec<Expr> = aggregations.iter().map(Aggregation::to_expr).collect();

    let out = df
        .clone()
        .lazy()
        .filter(non_null)
        .group_by_stable(keys)
        .agg(exprs)
        .collect()?;

    Ok(out)
}

/// Stable sort by one column, nulls last.
pub fn sort_by(df: &DataFrame, by: &str, descending: bool) -> Result<DataFrame, InsightError> {
    let sorted = df.sort(
        [by],
        SortMultipleOptions::default()
            .with_order_descending(descending)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )?;
    Ok(sorted)
}

/// The `n` rows with the largest (`descending = true`) or smallest value of
/// `by`. The sort is stable, so tied rows keep their aggregate-table order.
pub fn top_n(df: &DataFrame, by: &str, n: usize, descending: bool) -> Result<DataFrame, InsightError> {
    Ok(sort_by(df, by, descending)?.head(Some(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        df!(
            "country" => ["US", "US", "FR"],
            "price" => [100.0, 200.0, 50.0],
        )
        .unwrap()
    }

    #[test]
    fn sum_and_mean_per_group() {
        let out = aggregate(
            &sample(),
            &[Field::Country],
            &[
                Aggregation::sum(Field::Price, Some("total")).unwrap(),
                Aggregation::mean(Field::Price, None).unwrap(),
            ],
        )
        .unwrap();

        let expected = df!(
            "country" => ["US", "FR"],
            "total" => [300.0, 50.0],
            "price_mean" => [150.0, 50.0],
        )
        .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn null_group_keys_are_dropped() {
        let df = df!(
            "country" => [Some("US"), None, Some("US")],
            "price" => [100.0, 999.0, 200.0],
        )
        .unwrap();
        let out = aggregate(
            &df,
            &[Field::Country],
            &[Aggregation::sum(Field::Price, Some("total")).unwrap()],
        )
        .unwrap();

        let expected = df!("country" => ["US"], "total" => [300.0]).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn null_values_skipped_by_mean() {
        let df = df!(
            "country" => ["US", "US", "US"],
            "price" => [Some(100.0), None, Some(200.0)],
        )
        .unwrap();
        let out = aggregate(
            &df,
            &[Field::Country],
            &[Aggregation::mean(Field::Price, Some("avg")).unwrap()],
        )
        .unwrap();

        let expected = df!("country" => ["US"], "avg" => [150.0]).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn top_n_ties_keep_table_order() {
        let counts = df!(
            "host" => ["a", "b", "c", "d"],
            "listings" => [3.0, 5.0, 3.0, 1.0],
        )
        .unwrap();
        let out = top_n(&counts, "listings", 3, true).unwrap();

        let expected = df!(
            "host" => ["b", "a", "c"],
            "listings" => [5.0, 3.0, 3.0],
        )
        .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn count_counts_rows() {
        let out = aggregate(&sample(), &[Field::Country], &[Aggregation::count("listings")])
            .unwrap();
        let listings = out.column("listings").unwrap();
        assert_eq!(listings.get(0).unwrap().try_extract::<i64>().unwrap(), 2);
        assert_eq!(listings.get(1).unwrap().try_extract::<i64>().unwrap(), 1);
    }
}
