use crate::workbook::{CheckOutcome, Sheet, cell_reference};

pub const EXCEL_ERROR_LITERALS: [&str; 7] = [
    "#DIV/0!", "#REF!", "#NAME?", "#VALUE!", "#N/A", "#NUM!", "#NULL!",
];

fn is_formula(value: Option<&str>) -> bool {
    value.is_some_and(|text| text.trim_start().starts_with('='))
}

fn without_whitespace(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}

pub fn compare_formulas(first: &Sheet, second: &Sheet) -> CheckOutcome {
    let first_dimensions = first.dimensions();
    let second_dimensions = second.dimensions();
    if first_dimensions != second_dimensions {
        return CheckOutcome::fail(format!(
            "Sheets have different dimensions: '{}' is {}x{}, '{}' is {}x{}.",
            first.name,
            first_dimensions.0,
            first_dimensions.1,
            second.name,
            second_dimensions.0,
            second_dimensions.1
        ));
    }

    let (rows, columns) = first_dimensions;
    let mut differences = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let left = first.cell(row, column);
            let right = second.cell(row, column);
            if !is_formula(left) && !is_formula(right) {
                continue;
            }
            let left_text = left.unwrap_or_default();
            let right_text = right.unwrap_or_default();
            if without_whitespace(left_text) != without_whitespace(right_text) {
                differences.push(format!(
                    "Cell {}!{} has different formulas: '{left_text}' vs '{right_text}'",
                    first.name,
                    cell_reference(row, column)
                ));
            }
        }
    }

    if differences.is_empty() {
        return CheckOutcome::pass("All formulas are equivalent.");
    }
    CheckOutcome::fail(format!(
        "The following cells have different formulas:\n{}",
        differences.join("\n")
    ))
}

pub fn check_formula_errors(sheet: &Sheet) -> CheckOutcome {
    let mut errors = Vec::new();
    for (row_index, row) in sheet.rows.iter().enumerate() {
        for (column_index, cell) in row.iter().enumerate() {
            let Some(value) = cell.as_deref().map(str::trim) else {
                continue;
            };
            if EXCEL_ERROR_LITERALS.contains(&value) {
                errors.push(format!(
                    "Error in {}!{}: {value}",
                    sheet.name,
                    cell_reference(row_index, column_index)
                ));
            }
        }
    }

    if errors.is_empty() {
        return CheckOutcome::pass("No formula errors found.");
    }
    CheckOutcome::fail(errors.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::{check_formula_errors, compare_formulas};
    use crate::workbook::Sheet;

    fn formulas() -> Sheet {
        Sheet::from_rows(
            "Sheet1",
            &[&["=B1 + C1", "1", "2"], &["=B2 + C2", "3", "4"]],
        )
    }

    #[test]
    fn identical_formulas_pass_regardless_of_spacing() {
        let spaced = Sheet::from_rows("Sheet1", &[&["=B1+C1", "1", "2"], &["= B2 + C2", "3", "4"]]);
        let outcome = compare_formulas(&formulas(), &spaced);
        assert!(outcome.passed);
        assert_eq!(outcome.message, "All formulas are equivalent.");
    }

    #[test]
    fn differing_formulas_name_the_cell() {
        let other = Sheet::from_rows(
            "Sheet1",
            &[&["=B1 * C1", "1", "2"], &["=B2 * C2", "3", "4"]],
        );
        let outcome = compare_formulas(&formulas(), &other);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("The following cells have different formulas:"));
        assert!(outcome.message.contains("Cell Sheet1!A1 has different formulas"));
        assert!(outcome.message.contains("Cell Sheet1!A2 has different formulas"));
    }

    #[test]
    fn sheets_without_formulas_or_cells_pass() {
        let values = Sheet::from_rows("Sheet1", &[&["5", "7"], &["6", "8"]]);
        assert!(compare_formulas(&values, &values).passed);
        let empty = Sheet::new("Sheet1", Vec::new());
        assert!(compare_formulas(&empty, &empty).passed);
    }

    #[test]
    fn different_dimensions_fail() {
        let empty = Sheet::new("Sheet1", Vec::new());
        let outcome = compare_formulas(&formulas(), &empty);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("different dimensions"));
    }

    #[test]
    fn error_literals_are_reported_with_a1_references() {
        let sheet = Sheet::from_rows(
            "Sheet",
            &[&["1"], &["2"], &["#DIV/0!"], &["#REF!"], &["#NAME?"]],
        );
        let outcome = check_formula_errors(&sheet);
        assert!(!outcome.passed);
        assert!(outcome.message.contains("Error in Sheet!A3: #DIV/0!"));
        assert!(outcome.message.contains("Error in Sheet!A4: #REF!"));
        assert!(outcome.message.contains("Error in Sheet!A5: #NAME?"));
    }

    #[test]
    fn clean_sheet_has_no_errors() {
        let outcome = check_formula_errors(&Sheet::from_rows("Sheet", &[&["1", "=A1*2"]]));
        assert!(outcome.passed);
        assert_eq!(outcome.message, "No formula errors found.");
    }
}
