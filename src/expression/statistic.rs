use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use smallvec::SmallVec;

use crate::eval::context::ScriptingContext;
use crate::expression::node::Invariance;
use crate::expression::value_type::{Numeric, RefValue};
use crate::expression::variable::{ReferenceType, Variable};
use crate::foundation::error::{ValueRefError, ValueRefResult};
use crate::localization::string_table::StringTable;
use crate::universe::condition::Condition;

/// Reduction applied by a [`Statistic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StatisticType {
    /// Number of matches.
    Count,
    /// Number of distinct values.
    UniqueCount,
    /// 1 when anything matched, else 0.
    If,
    /// Sum of values.
    Sum,
    /// Arithmetic mean.
    Mean,
    /// Root mean square.
    Rms,
    /// Most frequent value.
    Mode,
    /// Largest value.
    Max,
    /// Smallest value.
    Min,
    /// `Max - Min`.
    Spread,
    /// Sample standard deviation.
    Stdev,
    /// Product of values.
    Product,
}

impl StatisticType {
    /// Every statistic, in script order.
    pub const ALL: [Self; 12] = [
        Self::Count,
        Self::UniqueCount,
        Self::If,
        Self::Sum,
        Self::Mean,
        Self::Rms,
        Self::Mode,
        Self::Max,
        Self::Min,
        Self::Spread,
        Self::Stdev,
        Self::Product,
    ];

    /// Script keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::UniqueCount => "CountUnique",
            Self::If => "If",
            Self::Sum => "Sum",
            Self::Mean => "Mean",
            Self::Rms => "RMS",
            Self::Mode => "Mode",
            Self::Max => "Max",
            Self::Min => "Min",
            Self::Spread => "Spread",
            Self::Stdev => "StDev",
            Self::Product => "Product",
        }
    }

    /// String-table key of the statistic's name.
    pub fn string_key(self) -> &'static str {
        match self {
            Self::Count => "DESC_STAT_COUNT",
            Self::UniqueCount => "DESC_STAT_COUNTUNIQUE",
            Self::If => "DESC_STAT_IF",
            Self::Sum => "DESC_STAT_SUM",
            Self::Mean => "DESC_STAT_MEAN",
            Self::Rms => "DESC_STAT_RMS",
            Self::Mode => "DESC_STAT_MODE",
            Self::Max => "DESC_STAT_MAX",
            Self::Min => "DESC_STAT_MIN",
            Self::Spread => "DESC_STAT_SPREAD",
            Self::Stdev => "DESC_STAT_STDEV",
            Self::Product => "DESC_STAT_PRODUCT",
        }
    }

    /// `false` for reductions computed from the match count alone.
    pub fn needs_values(self) -> bool {
        !matches!(self, Self::Count | Self::If)
    }
}

impl fmt::Display for StatisticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Aggregate of a property over the objects matched by a sampling condition.
///
/// The property path is read on each matched object through a nested context whose
/// local candidate is that object.
#[derive(Debug)]
pub struct Statistic<T: RefValue> {
    variable: Variable<T>,
    stat_type: StatisticType,
    sampling_condition: Box<dyn Condition>,
}

impl<T: RefValue> PartialEq for Statistic<T> {
    fn eq(&self, other: &Self) -> bool {
        self.stat_type == other.stat_type
            && self.variable == other.variable
            && self
                .sampling_condition
                .eq_condition(other.sampling_condition.as_ref())
    }
}

impl<T: RefValue> Statistic<T> {
    /// Build a statistic over the dotted `property` path of each match.
    ///
    /// `property` may be empty for `Count` and `If`.
    pub fn new(
        property: &str,
        stat_type: StatisticType,
        sampling_condition: Box<dyn Condition>,
    ) -> ValueRefResult<Self> {
        let path: SmallVec<[String; 4]> = if property.is_empty() {
            SmallVec::new()
        } else {
            property.split('.').map(str::to_owned).collect()
        };
        if path.iter().any(String::is_empty) {
            return Err(ValueRefError::config(format!(
                "statistic property `{property}` has an empty segment"
            )));
        }
        if path.is_empty() && stat_type.needs_values() {
            return Err(ValueRefError::config(format!(
                "{stat_type} statistic needs a property"
            )));
        }
        Ok(Self {
            variable: Variable::relative(path),
            stat_type,
            sampling_condition,
        })
    }

    /// Reduction applied.
    pub fn stat_type(&self) -> StatisticType {
        self.stat_type
    }

    /// Condition selecting the sampled objects.
    pub fn sampling_condition(&self) -> &dyn Condition {
        self.sampling_condition.as_ref()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(stat = ?self.stat_type))]
    pub(crate) fn eval(&self, ctx: &ScriptingContext<'_>) -> ValueRefResult<T> {
        if !T::supports_statistic(self.stat_type) {
            return Err(unsupported::<T>(self.stat_type));
        }

        let mut matches = self.sampling_condition.eval(ctx)?;
        let mut seen = BTreeSet::new();
        matches.retain(|obj| seen.insert(obj.id));
        tracing::debug!(matches = matches.len(), "sampled objects");

        let values = if self.stat_type.needs_values() {
            matches
                .iter()
                .map(|&obj| {
                    self.variable
                        .eval_as(ReferenceType::ConditionLocalCandidate, &ctx.nested(obj))
                })
                .collect::<ValueRefResult<Vec<T>>>()?
        } else {
            Vec::new()
        };

        T::reduce(self.stat_type, &values, matches.len())
    }

    pub(crate) fn invariance(&self) -> Invariance {
        let var = self.variable.invariance();
        let cond = &self.sampling_condition;
        Invariance {
            root_candidate: var.root_candidate && cond.root_candidate_invariant(),
            local_candidate: true,
            target: var.target && cond.target_invariant(),
            source: var.source && cond.source_invariant(),
        }
    }

    pub(crate) fn description(&self, strings: &StringTable) -> String {
        let args = [
            strings.user_string(self.stat_type.string_key()),
            if self.stat_type.needs_values() {
                self.variable.description(strings)
            } else {
                String::new()
            },
            self.sampling_condition.description(strings),
        ];
        strings.format("DESC_STATISTIC", &args).unwrap_or_else(|| {
            args.iter()
                .filter(|a| !a.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    pub(crate) fn dump(&self) -> String {
        let condition = self.sampling_condition.dump();
        if self.stat_type.needs_values() {
            format!(
                "Statistic {} value = {} condition = {condition}",
                self.stat_type,
                self.variable.dump()
            )
        } else {
            format!("Statistic {} condition = {condition}", self.stat_type)
        }
    }
}

pub(crate) fn unsupported<T: RefValue>(stat: StatisticType) -> ValueRefError {
    ValueRefError::invalid_operation(format!("{stat} statistic is not defined for {}", T::KIND))
}

/// Most frequent value; ties go to whichever value first reached the running maximum.
pub(crate) fn mode<T: RefValue>(values: &[T]) -> Option<T> {
    let mut histogram: BTreeMap<T::Key, usize> = BTreeMap::new();
    let mut best: Option<(&T, usize)> = None;
    for v in values {
        let count = histogram.entry(v.key()).or_insert(0);
        *count += 1;
        if best.is_none_or(|(_, max)| *count > max) {
            best = Some((v, *count));
        }
    }
    best.map(|(v, _)| v.clone())
}

/// First value that no later value strictly beats in direction `want`.
fn extreme<T: PartialOrd + Clone>(values: &[T], want: Ordering) -> Option<T> {
    let mut it = values.iter();
    let mut best = it.next()?;
    for v in it {
        if v.partial_cmp(best) == Some(want) {
            best = v;
        }
    }
    Some(best.clone())
}

fn overflow<T: RefValue>(stat: StatisticType) -> ValueRefError {
    ValueRefError::arithmetic(format!("{stat} statistic overflows {}", T::KIND))
}

pub(crate) fn reduce_numeric<N: Numeric>(
    stat: StatisticType,
    values: &[N],
    matches: usize,
) -> ValueRefResult<N> {
    let sum = || {
        values
            .iter()
            .try_fold(N::ZERO, |acc, v| acc.checked_add(*v))
            .ok_or_else(|| overflow::<N>(stat))
    };

    match stat {
        StatisticType::Count => N::from_count(matches),
        StatisticType::If => Ok(if matches > 0 { N::ONE } else { N::ZERO }),
        StatisticType::UniqueCount => {
            let distinct: BTreeSet<N::Key> = values.iter().map(RefValue::key).collect();
            N::from_count(distinct.len())
        }
        StatisticType::Sum => sum(),
        StatisticType::Product => values
            .iter()
            .try_fold(N::ONE, |acc, v| acc.checked_mul(*v))
            .ok_or_else(|| overflow::<N>(stat)),
        StatisticType::Mean => {
            if values.is_empty() {
                return Ok(N::ZERO);
            }
            let n = N::from_count(values.len())?;
            sum()?.checked_div(n).ok_or_else(|| overflow::<N>(stat))
        }
        StatisticType::Rms => {
            if values.is_empty() {
                return Ok(N::ZERO);
            }
            let squares: f64 = values.iter().map(|v| v.to_f64() * v.to_f64()).sum();
            N::from_f64((squares / values.len() as f64).sqrt())
        }
        StatisticType::Stdev => {
            if values.len() < 2 {
                return Ok(N::ZERO);
            }
            let n = values.len() as f64;
            let mean = values.iter().map(|v| v.to_f64()).sum::<f64>() / n;
            let var = values
                .iter()
                .map(|v| (v.to_f64() - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            N::from_f64(var.sqrt())
        }
        StatisticType::Max => Ok(extreme(values, Ordering::Greater).unwrap_or(N::ZERO)),
        StatisticType::Min => Ok(extreme(values, Ordering::Less).unwrap_or(N::ZERO)),
        StatisticType::Spread => {
            let (Some(max), Some(min)) = (
                extreme(values, Ordering::Greater),
                extreme(values, Ordering::Less),
            ) else {
                return Ok(N::ZERO);
            };
            max.checked_sub(min).ok_or_else(|| overflow::<N>(stat))
        }
        StatisticType::Mode => Ok(mode(values).unwrap_or(N::ZERO)),
    }
}

/// Reduction for enumerations: `Mode`, `Max` and `Min` by declaration order.
pub(crate) fn reduce_ordered<T: RefValue + Ord>(
    stat: StatisticType,
    values: &[T],
    empty: T,
) -> ValueRefResult<T> {
    match stat {
        StatisticType::Mode => Ok(mode(values).unwrap_or(empty)),
        StatisticType::Max => Ok(extreme(values, Ordering::Greater).unwrap_or(empty)),
        StatisticType::Min => Ok(extreme(values, Ordering::Less).unwrap_or(empty)),
        other => Err(unsupported::<T>(other)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/statistic.rs"]
mod tests;
