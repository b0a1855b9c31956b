//! Parsing of the query string for listing transactions.

use serde::Deserialize;

use crate::{
    Error,
    pagination::{PageRequest, PaginationConfig},
    transaction::{Category, TransactionType, validation::FieldError},
};

/// Restricts which transactions are returned. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub category: Option<Category>,
    pub transaction_type: Option<TransactionType>,
}

/// The field to sort transactions by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Title,
    Category,
    Type,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "date" => Some(SortField::Date),
            "amount" => Some(SortField::Amount),
            "title" => Some(SortField::Title),
            "category" => Some(SortField::Category),
            "type" => Some(SortField::Type),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    pub(crate) fn column(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::Title => "title",
            SortField::Category => "category",
            SortField::Type => "type",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

/// The order to sort transactions in a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    #[default]
    Descending,
}

impl SortOrder {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// A single sort key. Defaults to newest date first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    /// Parse a sort expression such as "-date" or "amount".
    ///
    /// A leading '-' sorts in descending order, otherwise the order is
    /// ascending. An optional leading '+' is allowed.
    pub fn parse(expression: &str) -> Option<Self> {
        let expression = expression.trim();

        let (order, name) = match expression.strip_prefix('-') {
            Some(name) => (SortOrder::Descending, name),
            None => (
                SortOrder::Ascending,
                expression.strip_prefix('+').unwrap_or(expression),
            ),
        };

        SortField::from_name(name).map(|field| Self { field, order })
    }
}

/// Defines how transactions should be fetched from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    pub sort: Sort,
    /// Selects up to `limit` transactions.
    pub limit: u64,
    /// Skips the first `offset` matching transactions.
    pub offset: u64,
}

/// The raw query string parameters of the list endpoint.
///
/// Kept as strings so that bad values produce a field error in the usual
/// JSON shape.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Turn the list endpoint's query string into a store query.
///
/// Empty parameters are treated as absent.
///
/// # Errors
///
/// Returns [Error::Validation] listing every invalid parameter.
pub fn parse_list_params(
    params: ListTransactionsParams,
    config: &PaginationConfig,
) -> Result<(TransactionQuery, PageRequest), Error> {
    let mut errors = Vec::new();
    let non_empty = |value: Option<String>| value.filter(|value| !value.trim().is_empty());

    let page = match non_empty(params.page) {
        None => config.default_page,
        Some(page) => match page.trim().parse::<u64>() {
            Ok(page) if page >= 1 => page,
            _ => {
                errors.push(FieldError::new("page", "Page must be a positive integer"));
                config.default_page
            }
        },
    };

    let page_size = match non_empty(params.limit) {
        None => config.default_limit(),
        Some(limit) => match limit.trim().parse::<u64>() {
            Ok(limit) if (1..=config.max_page_size).contains(&limit) => limit,
            _ => {
                errors.push(FieldError::new(
                    "limit",
                    &format!("Limit must be between 1 and {}", config.max_page_size),
                ));
                config.default_limit()
            }
        },
    };

    let sort = match non_empty(params.sort) {
        None => Sort::default(),
        Some(sort) => Sort::parse(&sort).unwrap_or_else(|| {
            errors.push(FieldError::new(
                "sort",
                "Sort must be one of date, amount, title, category, type, createdAt or \
                updatedAt, optionally prefixed with '-'",
            ));
            Sort::default()
        }),
    };

    let category = non_empty(params.category).and_then(|category| {
        let parsed = Category::from_name(category.trim());
        if parsed.is_none() {
            errors.push(FieldError::new("category", "Please select a valid category"));
        }
        parsed
    });

    let transaction_type = non_empty(params.transaction_type).and_then(|transaction_type| {
        let parsed = TransactionType::from_name(transaction_type.trim());
        if parsed.is_none() {
            errors.push(FieldError::new(
                "type",
                "Type must be either income or expense",
            ));
        }
        parsed
    });

    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let page_request = PageRequest { page, page_size };
    let query = TransactionQuery {
        filter: TransactionFilter {
            category,
            transaction_type,
        },
        sort,
        limit: page_size,
        offset: page_request.offset(),
    };

    Ok((query, page_request))
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        pagination::{PageRequest, PaginationConfig},
        transaction::{Category, TransactionType},
    };

    use super::{
        ListTransactionsParams, Sort, SortField, SortOrder, TransactionFilter, parse_list_params,
    };

    #[test]
    fn parses_sort_expressions() {
        assert_eq!(
            Sort::parse("-date"),
            Some(Sort {
                field: SortField::Date,
                order: SortOrder::Descending
            })
        );
        assert_eq!(
            Sort::parse("amount"),
            Some(Sort {
                field: SortField::Amount,
                order: SortOrder::Ascending
            })
        );
        assert_eq!(
            Sort::parse("+createdAt"),
            Some(Sort {
                field: SortField::CreatedAt,
                order: SortOrder::Ascending
            })
        );
        assert_eq!(Sort::parse("-"), None);
        assert_eq!(Sort::parse("colour"), None);
    }

    #[test]
    fn defaults_when_no_params_given() {
        let (query, page) =
            parse_list_params(ListTransactionsParams::default(), &PaginationConfig::default())
                .unwrap();

        assert_eq!(
            page,
            PageRequest {
                page: 1,
                page_size: 10
            }
        );
        assert_eq!(query.filter, TransactionFilter::default());
        assert_eq!(query.sort, Sort::default());
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn parses_all_params() {
        let params = ListTransactionsParams {
            page: Some("3".to_owned()),
            limit: Some("5".to_owned()),
            sort: Some("-amount".to_owned()),
            category: Some("Food".to_owned()),
            transaction_type: Some("expense".to_owned()),
        };

        let (query, page) = parse_list_params(params, &PaginationConfig::default()).unwrap();

        assert_eq!(
            page,
            PageRequest {
                page: 3,
                page_size: 5
            }
        );
        assert_eq!(query.offset, 10);
        assert_eq!(query.limit, 5);
        assert_eq!(query.filter.category, Some(Category::Food));
        assert_eq!(query.filter.transaction_type, Some(TransactionType::Expense));
        assert_eq!(query.sort.field, SortField::Amount);
        assert_eq!(query.sort.order, SortOrder::Descending);
    }

    #[test]
    fn empty_params_are_ignored() {
        let params = ListTransactionsParams {
            page: Some(String::new()),
            limit: Some(String::new()),
            sort: Some(String::new()),
            category: Some(String::new()),
            transaction_type: Some(String::new()),
        };

        let (query, _) = parse_list_params(params, &PaginationConfig::default()).unwrap();

        assert_eq!(query.filter, TransactionFilter::default());
    }

    #[test]
    fn rejects_invalid_params() {
        let params = ListTransactionsParams {
            page: Some("0".to_owned()),
            limit: Some("1000".to_owned()),
            sort: Some("colour".to_owned()),
            category: Some("Pets".to_owned()),
            transaction_type: Some("gift".to_owned()),
        };

        let result = parse_list_params(params, &PaginationConfig::default());

        let fields: Vec<String> = match result {
            Err(Error::Validation(errors)) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("want validation error, got {other:?}"),
        };
        assert_eq!(fields, ["page", "limit", "sort", "category", "type"]);
    }

    #[test]
    fn limit_respects_configured_maximum() {
        let config = PaginationConfig {
            max_page_size: 20,
            ..Default::default()
        };
        let params = ListTransactionsParams {
            limit: Some("21".to_owned()),
            ..Default::default()
        };

        let result = parse_list_params(params, &config);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn zero_default_page_size_falls_back_to_one() {
        let config = PaginationConfig {
            default_page_size: 0,
            ..Default::default()
        };

        let (query, page) = parse_list_params(ListTransactionsParams::default(), &config).unwrap();

        assert_eq!(page.page_size, 1);
        assert_eq!(query.limit, 1);
    }
}
