//! View builders: turn loaded tables into a [`crate::chart::model::ChartSpec`]
//! with every dropdown option precomputed.

pub mod income;
pub mod taxpayer;

/// Dropdown label for a column or sheet key: `"single_worker"` → `"Single Worker"`.
pub fn title_case(key: &str) -> String {
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::title_case;

    #[test]
    fn title_case_matches_dropdown_labels() {
        assert_eq!(title_case("single_worker"), "Single Worker");
        assert_eq!(title_case("family_two_earners"), "Family Two Earners");
        assert_eq!(title_case("married_2_children"), "Married 2 Children");
        assert_eq!(title_case(""), "");
    }
}
