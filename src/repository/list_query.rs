use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    consts::list_const::{DEFAULT_LIMIT, MAX_LIMIT},
    errors::Result,
    models::{
        fakturering::RECORD_FIELDS,
        status::{FakturaStatus, ListView},
    },
    utils::validator::{FieldErrors, parse_date},
};

/// Columns a list may be sorted by. Only these strings ever reach the SQL.
pub const SORT_COLUMNS: [&str; 16] = [
    "id",
    "vejman_id",
    "ansoger",
    "forste_sted",
    "tilladelsesnr",
    "cvr_nr",
    "tilladelses_type",
    "enhedspris",
    "meter",
    "startdato",
    "slutdato",
    "antal_dage",
    "total_pris",
    "faktura_status",
    "fakturanr",
    "fakturadato",
];

/// Columns matched by the free-text search.
const SEARCH_COLUMNS: [&str; 6] = [
    "ansoger",
    "forste_sted",
    "tilladelsesnr",
    "cvr_nr",
    "tilladelses_type",
    "vejman_id",
];

#[derive(Deserialize, Debug, Clone, Default, validator::Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    #[validate(length(max = 200))]
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub statuses: Option<String>,
    pub types: Option<String>,
    pub fra: Option<String>,
    pub til: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

fn comma_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// A validated list request for one view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter {
    pub statuses: Vec<FakturaStatus>,
    pub search: Option<String>,
    pub types: Vec<String>,
    pub fra: Option<NaiveDate>,
    pub til: Option<NaiveDate>,
    pub sort: &'static str,
    pub order: SortOrder,
    pub limit: u32,
    pub offset: u32,
}

impl ListFilter {
    pub fn for_view(view: ListView, query: &ListQuery) -> Result<Self> {
        let mut errors = FieldErrors::new();

        let mut statuses = view.statuses().to_vec();
        if query.statuses.is_some() {
            let requested: Vec<FakturaStatus> = comma_list(query.statuses.as_deref())
                .filter_map(|s| errors.check(s.parse::<FakturaStatus>()))
                .collect();
            statuses.retain(|s| requested.contains(s));
        }

        let sort = match query.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => "id",
            Some(requested) => match SORT_COLUMNS.iter().find(|c| **c == requested) {
                Some(column) => *column,
                None => {
                    errors.push(format!("Der kan ikke sorteres efter '{requested}'."));
                    "id"
                }
            },
        };

        let order = match query.order.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(other) => {
                errors.push(format!("Sorteringsrækkefølge skal være asc eller desc, ikke '{other}'."));
                SortOrder::Asc
            }
        };

        let fra = query
            .fra
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .and_then(|v| errors.check(parse_date(v, "Fra-dato")));
        let til = query
            .til
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .and_then(|v| errors.check(parse_date(v, "Til-dato")));

        errors.into_result()?;

        Ok(Self {
            statuses,
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            types: comma_list(query.types.as_deref()).map(str::to_string).collect(),
            fra,
            til,
            sort,
            order,
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: query.offset.unwrap_or(0),
        })
    }

    /// A narrowed status set with no overlap with the view matches nothing.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn where_clause(&self) -> (String, Vec<(&'static str, Value)>) {
        let statuses: Vec<&str> = self.statuses.iter().map(|s| s.as_str()).collect();
        let mut clauses = vec!["faktura_status INSIDE $statuses".to_string()];
        let mut binds = vec![("statuses", json!(statuses))];

        if let Some(search) = &self.search {
            let any_column = SEARCH_COLUMNS
                .iter()
                .map(|c| format!("string::contains(string::lowercase(type::string({c} ?? '')), $search)"))
                .collect::<Vec<_>>()
                .join(" OR ");
            clauses.push(format!("({any_column})"));
            binds.push(("search", json!(search)));
        }
        if !self.types.is_empty() {
            clauses.push("tilladelses_type INSIDE $types".to_string());
            binds.push(("types", json!(self.types)));
        }
        // ? periods overlapping [fra, til]
        if let Some(fra) = self.fra {
            clauses.push("slutdato >= $fra".to_string());
            binds.push(("fra", json!(fra)));
        }
        if let Some(til) = self.til {
            clauses.push("startdato <= $til".to_string());
            binds.push(("til", json!(til)));
        }

        (clauses.join(" AND "), binds)
    }

    pub fn order_clause(&self) -> String {
        if self.sort == "id" {
            format!("ORDER BY id {}", self.order.sql())
        } else {
            format!("ORDER BY {} {}, id ASC", self.sort, self.order.sql())
        }
    }

    /// Page query at index 0, total count at index 1.
    pub fn sql(&self) -> (String, Vec<(&'static str, Value)>) {
        let (where_clause, mut binds) = self.where_clause();
        let sql = format!(
            "SELECT {RECORD_FIELDS} FROM type::table($table) WHERE {where_clause} {} LIMIT $limit START $offset;\n\
             SELECT count() AS total FROM type::table($table) WHERE {where_clause} GROUP ALL;",
            self.order_clause()
        );
        binds.push(("limit", json!(self.limit)));
        binds.push(("offset", json!(self.offset)));
        (sql, binds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn query() -> ListQuery {
        ListQuery::default()
    }

    #[test]
    fn defaults_follow_the_view() {
        let filter = ListFilter::for_view(ListView::TilFakturering, &query()).unwrap();
        assert_eq!(
            filter.statuses,
            vec![FakturaStatus::Afsendt, FakturaStatus::TilFakturering]
        );
        assert_eq!(filter.limit, DEFAULT_LIMIT);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.order_clause(), "ORDER BY id ASC");
    }

    #[test]
    fn statuses_are_narrowed_to_the_view() {
        let q = ListQuery {
            statuses: Some("TilFakturering,Ny".into()),
            ..query()
        };
        let filter = ListFilter::for_view(ListView::TilFakturering, &q).unwrap();
        assert_eq!(filter.statuses, vec![FakturaStatus::TilFakturering]);

        let q = ListQuery {
            statuses: Some("Faktureret".into()),
            ..query()
        };
        assert!(ListFilter::for_view(ListView::IkkeFaktureret, &q).unwrap().is_empty());
    }

    #[test]
    fn sort_outside_allow_list_is_rejected() {
        let q = ListQuery {
            sort: Some("ansoger; DELETE vejman_fakturering".into()),
            ..query()
        };
        match ListFilter::for_view(ListView::Faktureret, &q) {
            Err(Error::Validation(messages)) => assert_eq!(messages.len(), 1),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn sort_adds_a_stable_tie_breaker() {
        let q = ListQuery {
            sort: Some("startdato".into()),
            order: Some("DESC".into()),
            ..query()
        };
        let filter = ListFilter::for_view(ListView::Faktureret, &q).unwrap();
        assert_eq!(filter.order_clause(), "ORDER BY startdato DESC, id ASC");
    }

    #[test]
    fn optional_filters_become_bound_parameters() {
        let q = ListQuery {
            search: Some("  Vestergade ".into()),
            types: Some("Container, Stillads".into()),
            fra: Some("01-01-2024".into()),
            til: Some("2024-12-31".into()),
            ..query()
        };
        let filter = ListFilter::for_view(ListView::IkkeFaktureret, &q).unwrap();
        let (clause, binds) = filter.where_clause();
        assert!(clause.contains("$search"));
        assert!(!clause.contains("vestergade"));
        assert!(clause.contains("tilladelses_type INSIDE $types"));
        assert!(clause.contains("slutdato >= $fra"));
        assert!(clause.contains("startdato <= $til"));

        let names: Vec<&str> = binds.iter().map(|(k, _)| *k).collect();
        assert_eq!(names, vec!["statuses", "search", "types", "fra", "til"]);
        assert_eq!(binds[1].1, json!("vestergade"));
        assert_eq!(binds[2].1, json!(["Container", "Stillads"]));
        assert_eq!(binds[3].1, json!("2024-01-01"));
    }

    #[test]
    fn bad_dates_and_order_accumulate() {
        let q = ListQuery {
            order: Some("sideways".into()),
            fra: Some("1/1/2024".into()),
            statuses: Some("Slettet".into()),
            ..query()
        };
        match ListFilter::for_view(ListView::Faktureret, &q) {
            Err(Error::Validation(messages)) => assert_eq!(messages.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
