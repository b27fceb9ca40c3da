// src/schema.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::sync::Arc;

use crate::raw::TableKind;

/// One output column, shared by every sink so they stay in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
}

const YEAR: Column = Column {
    name: "year",
    sql_type: "TEXT",
    nullable: false,
};
const GAME_NUM: Column = Column {
    name: "game_num",
    sql_type: "INTEGER",
    nullable: false,
};
const WEEK_NUM: Column = Column {
    name: "week_num",
    sql_type: "INTEGER",
    nullable: false,
};
const ROLE: Column = Column {
    name: "role",
    sql_type: "TEXT",
    nullable: false,
};
const VALUE: Column = Column {
    name: "value",
    sql_type: "REAL",
    nullable: true,
};

/// Output columns of `kind`, in write order.
pub fn columns(kind: TableKind) -> &'static [Column] {
    const WITH_ROLE: [Column; 5] = [YEAR, GAME_NUM, WEEK_NUM, ROLE, VALUE];
    const WITHOUT_ROLE: [Column; 4] = [YEAR, GAME_NUM, WEEK_NUM, VALUE];
    if kind.has_roles() {
        &WITH_ROLE
    } else {
        &WITHOUT_ROLE
    }
}

/// Map a column's SQL type onto the Arrow type its Parquet mirror uses.
///
/// - TEXT    → Utf8
/// - INTEGER → Int64
/// - REAL    → Float64
pub fn map_to_arrow_type(sql_type: &str) -> DataType {
    match sql_type {
        "INTEGER" => DataType::Int64,
        "REAL" => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Arrow schema (inside an Arc) for `kind`.
pub fn build_arrow_schema(kind: TableKind) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = columns(kind)
        .iter()
        .map(|col| ArrowField::new(col.name, map_to_arrow_type(col.sql_type), col.nullable))
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

/// `CREATE TABLE` statement for `kind`; the table is named after the kind.
pub fn create_table_sql(kind: TableKind) -> String {
    let cols: Vec<String> = columns(kind)
        .iter()
        .map(|c| {
            if c.nullable {
                format!("{} {}", c.name, c.sql_type)
            } else {
                format!("{} {} NOT NULL", c.name, c.sql_type)
            }
        })
        .collect();
    format!("CREATE TABLE {} ({})", kind.as_str(), cols.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_chain_cost_has_no_role() {
        let names: Vec<&str> = columns(TableKind::SupplyChainCost)
            .iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["year", "game_num", "week_num", "value"]);
    }

    #[test]
    fn create_sql_matches_columns() {
        assert_eq!(
            create_table_sql(TableKind::Orders),
            "CREATE TABLE orders (year TEXT NOT NULL, game_num INTEGER NOT NULL, \
             week_num INTEGER NOT NULL, role TEXT NOT NULL, value REAL)"
        );
    }

    #[test]
    fn arrow_schema_types() {
        let schema = build_arrow_schema(TableKind::Inventory);
        assert_eq!(schema.fields().len(), 5);
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        assert_eq!(schema.field(3).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(4).data_type(), &DataType::Float64);
        assert!(schema.field(4).is_nullable());
    }
}
