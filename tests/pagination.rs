use paygate::http::pagination::{page_params, PageQuery};

fn query(limit: Option<&str>, offset: Option<&str>) -> PageQuery {
    PageQuery {
        limit: limit.map(str::to_string),
        offset: offset.map(str::to_string),
    }
}

#[test]
fn absent_params_use_defaults() {
    assert_eq!(page_params(&query(None, None)), (10, 0));
}

#[test]
fn valid_params_are_honoured() {
    assert_eq!(page_params(&query(Some("25"), Some("50"))), (25, 50));
}

#[test]
fn zero_is_a_valid_value() {
    assert_eq!(page_params(&query(Some("0"), Some("0"))), (0, 0));
}

#[test]
fn negative_params_fall_back_to_defaults() {
    assert_eq!(page_params(&query(Some("-5"), Some("-1"))), (10, 0));
}

#[test]
fn non_numeric_params_fall_back_to_defaults() {
    assert_eq!(page_params(&query(Some("ten"), Some("1.5"))), (10, 0));
    assert_eq!(page_params(&query(Some(""), Some(" "))), (10, 0));
}
