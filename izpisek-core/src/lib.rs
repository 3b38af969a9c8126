//! izpisek-core: transaction records, merchant keys, category persistence,
//! and statement summaries.

pub mod category;
pub mod merchant;
pub mod summary;
pub mod transaction;

pub use category::{
    apply_categories, assign_category, CategoryMap, CategoryStore, JsonFileStore,
    CATEGORIES_FILE, MERCHANT_CATEGORIES_FILE,
};
pub use merchant::merchant_key;
pub use summary::{dedupe_by_id, monthly_summary, totals, MonthlySummary, Totals};
pub use transaction::{Transaction, TxnKind};
