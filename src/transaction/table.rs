//! The view-model engine for the transaction table.
//!
//! The table's view state (search, filters, sort, page, selection) lives in
//! URLs and form fields rather than server-side session state: every control
//! round-trips through a handler that rebuilds the visible rows from scratch
//! with the pure pipeline in this module. The pipeline always runs in the same
//! order: filter, then a stable sort, then pagination of the sorted sequence.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, de::IntoDeserializer};

use crate::{
    account::AccountId,
    pagination::{clamp_page, page_count},
};

use super::models::{Transaction, TransactionId, TransactionKind};

/// The transaction fields the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Sort chronologically.
    Date,
    /// Sort lexicographically by category key.
    Category,
    /// Sort numerically by amount.
    Amount,
}

impl SortField {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Category => "category",
            SortField::Amount => "amount",
        }
    }
}

/// The direction to sort in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Sort in order of increasing value.
    Asc,
    /// Sort in order of decreasing value.
    Desc,
}

impl SortDirection {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// The field to sort by.
    pub field: SortField,
    /// The direction to sort in.
    pub direction: SortDirection,
}

impl Default for SortConfig {
    /// Newest transactions first.
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

/// The recurring/non-recurring filter states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurringFilter {
    /// Show only recurring transactions.
    Recurring,
    /// Show only one-time transactions.
    NonRecurring,
}

impl RecurringFilter {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            RecurringFilter::Recurring => "recurring",
            RecurringFilter::NonRecurring => "non-recurring",
        }
    }
}

/// Deserialize an optional query parameter, treating the empty string sent by
/// a "no selection" form control as absent.
///
/// Unknown values are still rejected so typos in sort fields or filters fail
/// at the extraction boundary rather than being silently ignored.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => T::deserialize(text.into_deserializer())
            .map(Some)
            .map_err(|error: serde::de::value::Error| serde::de::Error::custom(error)),
    }
}

/// The raw query/form parameters that carry the table's view state.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    /// Case-insensitive substring filter over descriptions.
    pub search: Option<String>,
    /// Filter to income or expenses only.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub kind: Option<TransactionKind>,
    /// Filter to recurring or one-time transactions only.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub recurring: Option<RecurringFilter>,
    /// The field to sort by.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort: Option<SortField>,
    /// The direction to sort in.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub dir: Option<SortDirection>,
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The account the table is scoped to, if any.
    pub account_id: Option<AccountId>,
    /// The ids of the currently selected rows.
    #[serde(default)]
    pub selected: Vec<TransactionId>,
}

/// The set of selected row ids.
///
/// Kept in first-selected order so hidden form fields and re-rendered
/// checkboxes stay in a stable order across round trips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<TransactionId>,
}

impl Selection {
    /// Create a selection from raw ids, dropping duplicates.
    pub fn new(ids: Vec<TransactionId>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();

        Self { ids }
    }

    /// The selected ids in first-selected order.
    pub fn ids(&self) -> &[TransactionId] {
        &self.ids
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: TransactionId) -> bool {
        self.ids.contains(&id)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The number of selected rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Return a copy with `id` added if absent or removed if present.
    pub fn toggle(&self, id: TransactionId) -> Self {
        if self.contains(id) {
            Self {
                ids: self
                    .ids
                    .iter()
                    .copied()
                    .filter(|&other| other != id)
                    .collect(),
            }
        } else {
            let mut ids = self.ids.clone();
            ids.push(id);
            Self { ids }
        }
    }

    /// Replace the selection with exactly the ids visible on the current
    /// page — not the whole filtered set.
    pub fn select_page(page_ids: &[TransactionId]) -> Self {
        Self::new(page_ids.to_vec())
    }

    /// Drop ids that are no longer in the source list.
    ///
    /// The selection must stay a subset of the known transactions, e.g. after
    /// another tab deleted a row.
    pub fn retain_known(&mut self, known: &HashSet<TransactionId>) {
        self.ids.retain(|id| known.contains(id));
    }
}

/// The normalized view state that the render pipeline consumes.
///
/// Every user interaction maps to one of the builder methods below, which
/// construct the state for the target URL of that interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    /// Case-insensitive substring filter over descriptions. Empty means no
    /// filtering.
    pub search: String,
    /// Filter to income or expenses only.
    pub kind: Option<TransactionKind>,
    /// Filter to recurring or one-time transactions only.
    pub recurring: Option<RecurringFilter>,
    /// The active sort column and direction.
    pub sort: SortConfig,
    /// The requested 1-based page. Clamped against the filtered row count at
    /// render time.
    pub page: u64,
    /// The account the table is scoped to, if any.
    pub account_id: Option<AccountId>,
    /// The selected row ids.
    pub selected: Selection,
}

impl Default for TableOptions {
    /// No filters, the default sort, the first page, nothing selected.
    fn default() -> Self {
        Self {
            search: String::new(),
            kind: None,
            recurring: None,
            sort: SortConfig::default(),
            page: 1,
            account_id: None,
            selected: Selection::default(),
        }
    }
}

impl TableOptions {
    /// Normalize raw query parameters, applying defaults.
    pub fn from_query(query: TableQuery) -> Self {
        let default_sort = SortConfig::default();

        Self {
            search: query.search.unwrap_or_default(),
            kind: query.kind,
            recurring: query.recurring,
            sort: SortConfig {
                field: query.sort.unwrap_or(default_sort.field),
                direction: query.dir.unwrap_or(default_sort.direction),
            },
            page: query.page.unwrap_or(1),
            account_id: query.account_id,
            selected: Selection::new(query.selected),
        }
    }

    /// Change the search term. Resets to the first page since the old
    /// pagination position is meaningless under a different filter.
    pub fn with_search(self, search: &str) -> Self {
        Self {
            search: search.to_owned(),
            page: 1,
            ..self
        }
    }

    /// Change the income/expense filter. Resets to the first page.
    pub fn with_kind(self, kind: Option<TransactionKind>) -> Self {
        Self {
            kind,
            page: 1,
            ..self
        }
    }

    /// Change the recurring filter. Resets to the first page.
    pub fn with_recurring(self, recurring: Option<RecurringFilter>) -> Self {
        Self {
            recurring,
            page: 1,
            ..self
        }
    }

    /// Sort by `field`. Selecting the active field flips the direction;
    /// selecting a new field starts ascending.
    pub fn toggle_sort(self, field: SortField) -> Self {
        let sort = if self.sort.field == field {
            SortConfig {
                field,
                direction: self.sort.direction.toggled(),
            }
        } else {
            SortConfig {
                field,
                direction: SortDirection::Asc,
            }
        };

        Self { sort, ..self }
    }

    /// Jump to a page.
    pub fn with_page(self, page: u64) -> Self {
        Self { page, ..self }
    }

    /// Replace the selection.
    pub fn with_selection(self, selected: Selection) -> Self {
        Self { selected, ..self }
    }

    /// Reset search and filters and return to the first page.
    ///
    /// The sort and the selection survive: clearing filters widens the visible
    /// set, it does not un-choose rows.
    pub fn cleared(self) -> Self {
        Self {
            search: String::new(),
            kind: None,
            recurring: None,
            page: 1,
            ..self
        }
    }

    /// Whether any filter differs from the default state.
    pub fn has_filters(&self) -> bool {
        !self.search.is_empty() || self.kind.is_some() || self.recurring.is_some()
    }

    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(account_id) = self.account_id {
            pairs.push(("account_id", account_id.to_string()));
        }

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }

        if let Some(kind) = self.kind {
            pairs.push(("kind", kind.as_str().to_owned()));
        }

        if let Some(recurring) = self.recurring {
            pairs.push(("recurring", recurring.as_str().to_owned()));
        }

        pairs.push(("sort", self.sort.field.as_str().to_owned()));
        pairs.push(("dir", self.sort.direction.as_str().to_owned()));

        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }

        for id in self.selected.ids() {
            pairs.push(("selected", id.to_string()));
        }

        pairs
    }

    /// Encode the state as a query string.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self.to_query_pairs())
            .expect("string pairs always URL-encode cleanly")
    }

    /// Encode the state as a URL under `route`.
    pub fn to_url(&self, route: &str) -> String {
        format!("{route}?{}", self.to_query_string())
    }
}

/// Keep the rows that pass all three filters.
///
/// Returned in source order; sorting happens afterwards so filtering never
/// affects tie-breaking.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    options: &TableOptions,
) -> Vec<&'a Transaction> {
    let search = options.search.to_lowercase();

    transactions
        .iter()
        .filter(|transaction| {
            let matches_search =
                search.is_empty() || transaction.description.to_lowercase().contains(&search);
            let matches_kind = options
                .kind
                .is_none_or(|kind| transaction.kind == kind);
            let matches_recurring = options.recurring.is_none_or(|recurring| match recurring {
                RecurringFilter::Recurring => transaction.is_recurring,
                RecurringFilter::NonRecurring => !transaction.is_recurring,
            });

            matches_search && matches_kind && matches_recurring
        })
        .collect()
}

/// Sort rows in place by the configured field and direction.
///
/// The sort is stable, so rows that compare equal keep their relative source
/// order. Reversing the comparison rather than the sorted output preserves
/// that property for descending sorts.
pub fn sort_transactions(rows: &mut [&Transaction], sort: SortConfig) {
    rows.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Amount => a.amount.total_cmp(&b.amount),
        };

        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// The derived state the table view renders from.
#[derive(Debug)]
pub struct TableView<'a> {
    /// The rows visible on the current page, in display order.
    pub rows: Vec<&'a Transaction>,
    /// The current page after clamping.
    pub page: u64,
    /// The total number of pages, at least 1.
    pub page_count: u64,
    /// How many rows passed the filters.
    pub filtered_count: usize,
}

impl TableView<'_> {
    /// The ids of the rows visible on the current page.
    pub fn visible_ids(&self) -> Vec<TransactionId> {
        self.rows.iter().map(|transaction| transaction.id).collect()
    }

    /// Whether every visible row is selected (and there is at least one).
    pub fn all_visible_selected(&self, selection: &Selection) -> bool {
        !self.rows.is_empty()
            && self
                .rows
                .iter()
                .all(|transaction| selection.contains(transaction.id))
    }
}

/// Derive the visible rows for the current view state.
///
/// Applies the pipeline in its fixed order: filter, stable sort, then window
/// the sorted sequence to the (clamped) requested page. Changing the page can
/// therefore never re-filter or re-sort.
pub fn build_table_view<'a>(
    transactions: &'a [Transaction],
    options: &TableOptions,
    page_size: u64,
) -> TableView<'a> {
    let mut rows = filter_transactions(transactions, options);
    sort_transactions(&mut rows, options.sort);

    let page_count = page_count(rows.len() as u64, page_size);
    let page = clamp_page(options.page, page_count);

    let start = ((page - 1) * page_size) as usize;
    let end = usize::min(start + page_size as usize, rows.len());
    let filtered_count = rows.len();
    rows.truncate(end);
    let visible = rows.split_off(usize::min(start, end));

    TableView {
        rows: visible,
        page,
        page_count,
        filtered_count,
    }
}
