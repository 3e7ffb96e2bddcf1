#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnNote {
  Primary,
  None,
}

#[derive(Debug, Clone)]
pub struct ColumnMapper {
  pub name: String,
  pub column: String,
  pub note: ColumnNote,
}

pub fn column(name: &'static str) -> ColumnMapper {
  ColumnMapper {
    name: name.to_string(),
    column: name.to_string(),
    note: ColumnNote::None,
  }
}

pub fn primary(name: &'static str) -> ColumnMapper {
  ColumnMapper {
    note: ColumnNote::Primary,
    ..column(name)
  }
}

/// Column layout of one table, used to build the plain CRUD statements.
#[derive(Debug, Default, Clone)]
pub struct ColumnMappers {
  pub table_name: &'static str,
  pub columns: Vec<ColumnMapper>,
}

impl ColumnMappers {
  fn primary_column(&self) -> Option<&ColumnMapper> {
    self.columns.iter().find(|col| col.note == ColumnNote::Primary)
  }

  fn value_columns(&self) -> impl Iterator<Item = &ColumnMapper> {
    self.columns.iter().filter(|col| col.note != ColumnNote::Primary)
  }

  /// Comma separated list of all columns, prefixed with `alias.` when given.
  pub fn get_columns(&self, alias: Option<&str>) -> String {
    self.columns.iter().map(|col| {
      match alias {
        Some(alias) => format!("{}.{}", alias, col.column),
        None => col.column.clone(),
      }
    }).collect::<Vec<String>>().join(", ")
  }

  pub fn build_select_query(&self) -> String {
    format!("SELECT {} FROM {}", self.get_columns(None), self.table_name)
  }

  /// Insert every non-primary column, returning the new primary key.
  pub fn build_insert_query(&self) -> String {
    let mut names = Vec::new();
    let mut values = Vec::new();
    for (idx, col) in self.value_columns().enumerate() {
      names.push(col.column.clone());
      values.push(format!("${}", idx + 1));
    }
    let mut sql = format!("INSERT INTO {}({}) VALUES({})",
      self.table_name, names.join(", "), values.join(", "));
    if let Some(primary) = self.primary_column() {
      sql.push_str(&format!(" RETURNING {}", primary.column));
    }
    sql
  }

  /// Overwrite every non-primary column of the row matching `lookup`.
  /// The lookup value is the last parameter.
  pub fn build_update_where(&self, lookup: &str) -> String {
    let mut lookup_column = lookup.to_string();
    let mut sets = Vec::new();
    for col in self.columns.iter() {
      if col.name == lookup {
        lookup_column = col.column.clone();
      } else if col.note != ColumnNote::Primary {
        sets.push(format!("{} = ${}", col.column, sets.len() + 1));
      }
    }
    format!("UPDATE {} SET {} WHERE {} = ${}",
      self.table_name, sets.join(", "), lookup_column, sets.len() + 1)
  }
}
