//! Reducers over the output of an aggregation pipeline

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Tour};

/// Summary of all tours sharing one difficulty level
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    /// `None` groups tours without a difficulty
    pub difficulty: Option<Difficulty>,
    pub num_tours: usize,
    pub num_ratings: u64,
    pub avg_rating: f64,
    pub avg_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Groups tours by difficulty, cheapest average price first
pub fn difficulty_stats(tours: &[Tour]) -> Vec<DifficultyStats> {
    let mut groups: BTreeMap<Option<Difficulty>, Vec<&Tour>> = BTreeMap::new();
    for tour in tours {
        groups.entry(tour.difficulty).or_default().push(tour);
    }

    let mut stats: Vec<DifficultyStats> = groups
        .into_iter()
        .map(|(difficulty, group)| {
            let prices: Vec<f64> = group.iter().filter_map(|tour| tour.price).collect();
            let rating_sum: f64 = group.iter().map(|tour| tour.ratings_average).sum();

            DifficultyStats {
                difficulty,
                num_tours: group.len(),
                num_ratings: group.iter().map(|tour| u64::from(tour.ratings_quantity)).sum(),
                avg_rating: rating_sum / group.len() as f64,
                avg_price: (!prices.is_empty())
                    .then(|| prices.iter().sum::<f64>() / prices.len() as f64),
                min_price: prices.iter().copied().reduce(f64::min),
                max_price: prices.iter().copied().reduce(f64::max),
            }
        })
        .collect();

    stats.sort_by(|a, b| match (a.avg_price, b.avg_price) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    stats
}

/// Tour starts within one calendar month
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPlan {
    /// 1 = January
    pub month: u32,
    pub num_tour_starts: usize,
    pub tours: Vec<String>,
}

/// Busiest months of `year` first; ties keep calendar order
pub fn monthly_plan(tours: &[Tour], year: i32) -> Vec<MonthlyPlan> {
    let mut months: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for tour in tours {
        for start in tour.start_dates.iter().filter(|date| date.year() == year) {
            months.entry(start.month()).or_default().push(tour.name.clone());
        }
    }

    let mut plan: Vec<MonthlyPlan> = months
        .into_iter()
        .map(|(month, tours)| MonthlyPlan {
            month,
            num_tour_starts: tours.len(),
            tours,
        })
        .collect();
    plan.sort_by(|a, b| b.num_tour_starts.cmp(&a.num_tour_starts));
    plan
}
