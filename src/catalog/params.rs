use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use crate::domain::{InventoryStatus, Product};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Field the catalog can be ordered by. Anything else is rejected when parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Id,
    Code,
    Name,
    Description,
    Image,
    Category,
    Price,
    Quantity,
    InternalReference,
    ShellId,
    InventoryStatus,
    Rating,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 14] = [
        SortField::Id,
        SortField::Code,
        SortField::Name,
        SortField::Description,
        SortField::Image,
        SortField::Category,
        SortField::Price,
        SortField::Quantity,
        SortField::InternalReference,
        SortField::ShellId,
        SortField::InventoryStatus,
        SortField::Rating,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    /// Name of the field as it appears in stored records and request parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Code => "code",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::Image => "image",
            SortField::Category => "category",
            SortField::Price => "price",
            SortField::Quantity => "quantity",
            SortField::InternalReference => "internalReference",
            SortField::ShellId => "shellId",
            SortField::InventoryStatus => "inventoryStatus",
            SortField::Rating => "rating",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Typed accessor for this field. `None` means the record has no value.
    pub fn key(self, product: &Product) -> Option<SortKey<'_>> {
        match self {
            SortField::Id => Some(SortKey::Unsigned(product.id)),
            SortField::Code => product.code.as_deref().map(SortKey::Text),
            SortField::Name => product.name.as_deref().map(SortKey::Text),
            SortField::Description => product.description.as_deref().map(SortKey::Text),
            SortField::Image => product.image.as_deref().map(SortKey::Text),
            SortField::Category => Some(SortKey::Text(&product.category)),
            SortField::Price => Some(SortKey::Float(product.price)),
            SortField::Quantity => Some(SortKey::Unsigned(u64::from(product.quantity))),
            SortField::InternalReference => product.internal_reference.as_deref().map(SortKey::Text),
            SortField::ShellId => product.shell_id.map(SortKey::Unsigned),
            SortField::InventoryStatus => product.inventory_status.map(SortKey::Status),
            SortField::Rating => product.rating.map(SortKey::Float),
            SortField::CreatedAt => product.created_at.map(SortKey::Signed),
            SortField::UpdatedAt => product.updated_at.map(SortKey::Signed),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CatalogError::invalid("sort", format!("unknown sort field '{s}'")))
    }
}

/// Comparable value extracted from a product for one [`SortField`].
///
/// Values of one field always share a variant. Floats compare with
/// [`f64::total_cmp`], text compares byte-wise and case-sensitively.
#[derive(Debug, Clone, Copy)]
pub enum SortKey<'a> {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(&'a str),
    Status(InventoryStatus),
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Unsigned(_) => 0,
            SortKey::Signed(_) => 1,
            SortKey::Float(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Status(_) => 4,
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (SortKey::Unsigned(a), SortKey::Unsigned(b)) => a.cmp(b),
            (SortKey::Signed(a), SortKey::Signed(b)) => a.cmp(b),
            (SortKey::Float(a), SortKey::Float(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Status(a), SortKey::Status(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for SortKey<'_> {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(CatalogError::invalid("order", format!("expected 'asc' or 'desc', got '{s}'"))),
        }
    }
}

/// Validated catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub page: usize,
    pub limit: usize,
    pub search: String,
    pub sort: SortField,
    pub order: SortOrder,
    /// Exact category match; `None` keeps every category.
    pub category: Option<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            sort: SortField::default(),
            order: SortOrder::default(),
            category: None,
        }
    }
}

impl QueryParams {
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Checks the numeric bounds the query engine depends on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.page == 0 {
            return Err(CatalogError::invalid("page", "must be at least 1"));
        }
        if self.limit == 0 {
            return Err(CatalogError::invalid("limit", "must be at least 1"));
        }
        Ok(())
    }
}

/// Request field that may arrive as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl LooseValue {
    /// Parses the value as a positive integer. Blank text counts as absent.
    fn positive_integer(&self, name: &'static str) -> Result<Option<usize>, CatalogError> {
        let value = match self {
            LooseValue::Integer(n) => *n,
            LooseValue::Float(f) if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f) => *f as i64,
            LooseValue::Float(f) if f.fract() == 0.0 => {
                return Err(CatalogError::invalid(name, format!("{f} is out of range")));
            }
            LooseValue::Float(f) => {
                return Err(CatalogError::invalid(name, format!("'{f}' is not an integer")));
            }
            LooseValue::Text(s) if s.trim().is_empty() => return Ok(None),
            LooseValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| CatalogError::invalid(name, format!("'{s}' is not an integer")))?,
        };

        if value < 1 {
            return Err(CatalogError::invalid(name, format!("must be at least 1, got {value}")));
        }
        usize::try_from(value)
            .map(Some)
            .map_err(|_| CatalogError::invalid(name, format!("{value} is out of range")))
    }
}

/// Query parameters as they arrive from a request, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQueryParams {
    pub page: Option<LooseValue>,
    pub limit: Option<LooseValue>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub category: Option<String>,
}

impl TryFrom<RawQueryParams> for QueryParams {
    type Error = CatalogError;

    fn try_from(raw: RawQueryParams) -> Result<Self, Self::Error> {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let page = match &raw.page {
            Some(value) => value.positive_integer("page")?.unwrap_or(DEFAULT_PAGE),
            None => DEFAULT_PAGE,
        };
        let limit = match &raw.limit {
            Some(value) => value.positive_integer("limit")?.unwrap_or(DEFAULT_LIMIT),
            None => DEFAULT_LIMIT,
        };
        let sort = match non_blank(raw.sort) {
            Some(field) => field.trim().parse()?,
            None => SortField::default(),
        };
        let order = match non_blank(raw.order) {
            Some(order) => order.trim().parse()?,
            None => SortOrder::default(),
        };

        Ok(QueryParams {
            page,
            limit,
            search: raw.search.unwrap_or_default(),
            sort,
            order,
            category: non_blank(raw.category),
        })
    }
}
