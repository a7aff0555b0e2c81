//! Query planner: `QueryConstraints` → `FilterSpec`.

use guide_core::{Category, Intent, QueryConstraints};
use guide_store::FilterSpec;

/// Pure mapping from constraints to store predicates.
pub struct QueryPlanner;

impl QueryPlanner {
    pub fn plan(constraints: &QueryConstraints) -> FilterSpec {
        FilterSpec {
            categories: Self::categories(constraints),
            window: constraints.date_window,
            venue: constraints.venue_hint.clone(),
            max_price: constraints.max_price,
        }
    }

    /// An explicit category noun beats the intent. General event questions
    /// still cover concerts.
    fn categories(constraints: &QueryConstraints) -> Vec<Category> {
        if let Some(hint) = constraints.category_hint {
            return vec![hint];
        }
        match constraints.intent {
            Intent::FindConcerts => vec![Category::Concert],
            Intent::FindDeals => vec![Category::Deal],
            Intent::FindEvents => vec![Category::Event, Category::Concert],
            Intent::Unknown => Category::ALL.to_vec(),
        }
    }
}
