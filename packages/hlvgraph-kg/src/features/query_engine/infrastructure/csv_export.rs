//! Result tables as comma-separated files
//!
//! Header row = variable names. Cells hold the lexical value of the binding;
//! unbound cells are empty.

use std::io::Write;

use hlvgraph_storage::{ResultTable, Term};

use crate::errors::Result;

pub fn write_table(table: &ResultTable, writer: impl Write) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&table.columns)?;
    for row in &table.rows {
        csv.write_record(
            row.iter()
                .map(|cell| cell.as_ref().map(Term::lexical).unwrap_or("")),
        )?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlvgraph_storage::Literal;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_table() {
        let mut table = ResultTable::new(vec!["token".into(), "sentence".into()]);
        table.rows.push(vec![
            Some(Literal::lang_string("foo", "en").into()),
            Some(Literal::lang_string("A foo, here.", "en").into()),
        ]);
        table.rows.push(vec![Some(Literal::string("bar").into()), None]);

        let mut out = Vec::new();
        write_table(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "token,sentence\nfoo,\"A foo, here.\"\nbar,\n"
        );
    }

    #[test]
    fn test_empty_table_has_header() {
        let table = ResultTable::new(vec!["pos".into()]);
        let mut out = Vec::new();
        write_table(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "pos\n");
    }
}
