use crate::{
    config::settings::REPORT_SLOTS,
    feed::extract::NormalizedNeo,
    foundation::error::{NeoError, NeoResult},
};

/// A NEO selected for the report, with its layout slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RankedAsteroid {
    pub neo: NormalizedNeo,
    /// `min_diam_m + max_diam_m / 2`, see [`report_diameter`].
    pub avg_diam_m: f64,
    /// 0-based position by ascending miss distance; doubles as the layout slot key.
    pub rank: usize,
}

/// Diameter used to size report icons.
///
/// This is the minimum plus half the maximum, not the midpoint of the two bounds.
pub fn report_diameter(min_diam_m: f64, max_diam_m: f64) -> f64 {
    min_diam_m + max_diam_m / 2.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApproachRow {
    pub neo: NormalizedNeo,
    pub avg_diam_m: f64,
}

/// Tabular projection of extracted NEOs, one row each.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApproachTable {
    rows: Vec<ApproachRow>,
}

impl ApproachTable {
    pub fn from_neos(neos: &[NormalizedNeo]) -> Self {
        let rows = neos
            .iter()
            .map(|neo| ApproachRow {
                avg_diam_m: report_diameter(neo.min_diam_m, neo.max_diam_m),
                neo: neo.clone(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ApproachRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ascending by miss distance. Stable: equal distances keep their current order.
    pub fn sorted_by_miss_distance(mut self) -> Self {
        self.rows.sort_by_key(|r| r.neo.miss_distance_km);
        self
    }

    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Assign `rank` from row position.
    pub fn into_ranked(self) -> Vec<RankedAsteroid> {
        self.rows
            .into_iter()
            .enumerate()
            .map(|(rank, row)| RankedAsteroid {
                neo: row.neo,
                avg_diam_m: row.avg_diam_m,
                rank,
            })
            .collect()
    }
}

/// Select the [`REPORT_SLOTS`] closest approaches, ranked 0.. by miss distance.
///
/// Fewer candidates than slots is an error: the layout has one fixed slot per rank and a
/// partial report would leave slots empty.
#[tracing::instrument(skip(neos), fields(candidates = neos.len()))]
pub fn rank_closest(neos: &[NormalizedNeo]) -> NeoResult<Vec<RankedAsteroid>> {
    if neos.len() < REPORT_SLOTS {
        return Err(NeoError::validation(format!(
            "need at least {REPORT_SLOTS} complete NEO records to rank, found {}",
            neos.len()
        )));
    }

    let ranked = ApproachTable::from_neos(neos)
        .sorted_by_miss_distance()
        .head(REPORT_SLOTS)
        .into_ranked();

    for a in &ranked {
        tracing::debug!(
            rank = a.rank,
            name = %a.neo.name,
            miss_distance_km = a.neo.miss_distance_km,
            avg_diam_m = a.avg_diam_m,
            "ranked asteroid"
        );
    }
    Ok(ranked)
}

#[cfg(test)]
#[path = "../../tests/unit/rank/table.rs"]
mod tests;
