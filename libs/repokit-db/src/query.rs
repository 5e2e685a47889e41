//! Applying specifications, order options and paging to a `Select`.

use std::str::FromStr;

use repokit_spec::{NullsOrder, OrderDirection, OrderOptions, PagingOptions, Specification};
use sea_orm::sea_query::NullOrdering;
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select};

use crate::error::RepoResult;
use crate::translate::{resolve_column, spec_to_condition};

/// Largest LIMIT accepted by every supported backend; used for offset-only windows.
const UNBOUNDED_LIMIT: u64 = 9_223_372_036_854_775_807;

/// Extension trait adding the repository vocabulary to `SeaORM` selects.
pub trait SpecificationQueryExt<E: EntityTrait>: Sized {
    /// Add the condition translated from `spec`.
    ///
    /// # Errors
    /// Translation errors from [`spec_to_condition`].
    fn apply_specification(self, spec: &Specification) -> RepoResult<Self>;

    /// Append `order` as ORDER BY keys, left to right.
    ///
    /// # Errors
    /// `RepoError::UnknownAttribute` for a field that is not a column.
    fn apply_order_options(self, order: &OrderOptions) -> RepoResult<Self>;

    /// Apply LIMIT/OFFSET.
    #[must_use]
    fn apply_paging(self, paging: PagingOptions) -> Self;
}

impl<E> SpecificationQueryExt<E> for Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy + FromStr,
{
    fn apply_specification(self, spec: &Specification) -> RepoResult<Self> {
        Ok(self.filter(spec_to_condition::<E>(spec)?))
    }

    fn apply_order_options(mut self, order: &OrderOptions) -> RepoResult<Self> {
        for option in order {
            let col = resolve_column::<E>(&option.field)?;
            let ord = match option.direction {
                OrderDirection::Asc => Order::Asc,
                OrderDirection::Desc => Order::Desc,
            };
            self = match option.nulls {
                Some(NullsOrder::First) => self.order_by_with_nulls(col, ord, NullOrdering::First),
                Some(NullsOrder::Last) => self.order_by_with_nulls(col, ord, NullOrdering::Last),
                None => self.order_by(col, ord),
            };
        }
        Ok(self)
    }

    fn apply_paging(self, paging: PagingOptions) -> Self {
        let limit = match paging {
            PagingOptions { limit: Some(l), .. } => Some(l),
            PagingOptions {
                limit: None,
                offset: Some(_),
            } => Some(UNBOUNDED_LIMIT),
            PagingOptions {
                limit: None,
                offset: None,
            } => None,
        };
        let mut s = self;
        if let Some(l) = limit {
            s = QuerySelect::limit(s, l);
        }
        if let Some(o) = paging.offset {
            s = QuerySelect::offset(s, o);
        }
        s
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use repokit_spec::OrderOption;
    use sea_orm::{DbBackend, QueryTrait};

    mod ent {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "items")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub name: Option<String>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn sql(select: Select<ent::Entity>) -> String {
        select.build(DbBackend::Sqlite).to_string()
    }

    #[test]
    fn compound_order_left_to_right() {
        let order = OrderOptions::new()
            .desc("id")
            .push(OrderOption::new("name", OrderDirection::Asc).with_nulls(NullsOrder::First));
        let s = sql(ent::Entity::find().apply_order_options(&order).unwrap());
        assert!(
            s.ends_with(r#"ORDER BY "items"."id" DESC, "items"."name" ASC NULLS FIRST"#),
            "{s}"
        );
    }

    #[test]
    fn unknown_order_field_is_rejected() {
        let order = OrderOptions::new().asc("missing");
        assert!(ent::Entity::find().apply_order_options(&order).is_err());
    }

    #[test]
    fn paging_variants() {
        let s = sql(ent::Entity::find().apply_paging(PagingOptions::new(Some(2), Some(1))));
        assert!(s.ends_with("LIMIT 2 OFFSET 1"), "{s}");

        let s = sql(ent::Entity::find().apply_paging(PagingOptions::new(None, Some(4))));
        assert!(s.ends_with("LIMIT 9223372036854775807 OFFSET 4"), "{s}");

        let s = sql(ent::Entity::find().apply_paging(PagingOptions::default()));
        assert!(!s.contains("LIMIT"), "{s}");
    }
}
