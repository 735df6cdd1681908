use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Allow unused_mut because the variable is only mutated when optional
            // field assignments are passed to the macro (e.g., `is_primary_key = true`)
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                is_autoincrement: false,
                non_null: false,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }

    fn from_sql(s: &str) -> Option<&'static SqlType> {
        match s {
            "TEXT" => Some(&SqlType::Text),
            "INTEGER" => Some(&SqlType::Integer),
            "REAL" => Some(&SqlType::Real),
            _ => None,
        }
    }
}

pub struct Column<'a, S: AsRef<str>> {
    pub name: S,
    pub sql_type: &'a SqlType,
    pub is_primary_key: bool,
    /// Only meaningful on an INTEGER primary key.
    pub is_autoincrement: bool,
    pub non_null: bool,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column<'static, &'static str>],
}

impl Table {
    pub fn create_sql(&self) -> String {
        let mut create_sql = format!("CREATE TABLE IF NOT EXISTS {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!("{} {}", column.name, column.sql_type.as_sql()));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
                if column.is_autoincrement {
                    create_sql.push_str(" AUTOINCREMENT");
                }
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
        }
        create_sql.push_str(");");
        create_sql
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {};", self.name)
    }

    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute(&self.create_sql(), params![])
            .with_context(|| format!("Failed to create table {}", self.name))?;
        Ok(())
    }

    pub fn drop_if_exists(&self, conn: &Connection) -> Result<()> {
        conn.execute(&self.drop_sql(), params![])
            .with_context(|| format!("Failed to drop table {}", self.name))?;
        Ok(())
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

pub struct Schema {
    pub tables: &'static [Table],
}

impl Schema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.create(conn)?;
        }
        Ok(())
    }

    /// Drops tables in reverse creation order.
    pub fn drop_all(&self, conn: &Connection) -> Result<()> {
        for table in self.tables.iter().rev() {
            table.drop_if_exists(conn)?;
        }
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", table.name))?;
            let actual_columns: Vec<Column<'_, String>> = stmt
                .query_map(params![], |row| {
                    let name = row.get::<usize, String>(1)?;
                    let declared_type = row.get::<_, String>(2)?;
                    let sql_type = SqlType::from_sql(&declared_type).ok_or_else(|| {
                        rusqlite::Error::InvalidColumnType(
                            2,
                            declared_type.clone(),
                            rusqlite::types::Type::Text,
                        )
                    })?;
                    Ok(Column {
                        name,
                        sql_type,
                        non_null: row.get::<_, i32>(3)? == 1,
                        is_primary_key: row.get::<_, i32>(5)? == 1,
                        is_autoincrement: false,
                    })
                })?
                .collect::<rusqlite::Result<_>>()
                .with_context(|| format!("Failed to read columns of table {}", table.name))?;

            if actual_columns.is_empty() {
                bail!("Table {} does not exist", table.name);
            }

            if actual_columns.len() != table.columns.len() {
                bail!(
                    "Table {} has {} columns, expected {}. Found column names: {}, expected: {}",
                    table.name,
                    actual_columns.len(),
                    table.columns.len(),
                    actual_columns
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    table.column_names().join(", ")
                );
            }

            for (actual_column, expected_column) in actual_columns.iter().zip(table.columns.iter())
            {
                if actual_column.name != expected_column.name {
                    bail!(
                        "Table {} Column name mismatch: expected {}, got {}",
                        table.name,
                        expected_column.name,
                        actual_column.name
                    );
                }
                if actual_column.sql_type != expected_column.sql_type {
                    bail!(
                        "Table {} Column {} type mismatch: expected {:?}, got {:?}",
                        table.name,
                        expected_column.name,
                        expected_column.sql_type,
                        actual_column.sql_type
                    );
                }
                if actual_column.non_null != expected_column.non_null {
                    bail!(
                        "Table {} Column {} non-null mismatch: expected {}, got {}",
                        table.name,
                        expected_column.name,
                        expected_column.non_null,
                        actual_column.non_null
                    );
                }
                if actual_column.is_primary_key != expected_column.is_primary_key {
                    bail!(
                        "Table {} Column {} primary key mismatch: expected {}, got {}",
                        table.name,
                        expected_column.name,
                        expected_column.is_primary_key,
                        actual_column.is_primary_key
                    );
                }
            }
        }
        Ok(())
    }
}
