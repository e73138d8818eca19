#[test]
#[should_panic]
fn ragged_rows() {
    let yaml = "
coefficients:
  - [1, 2]
  - [3]
rhs:
  - [1, 1]
";
    let _ = pose_matrix::loads(yaml).unwrap();
}

#[test]
#[should_panic]
fn more_columns_than_rows() {
    let yaml = "
coefficients:
  - [1, 2, 3]
  - [4, 5, 6]
rhs:
  - [1, 1]
";
    let _ = pose_matrix::loads(yaml).unwrap();
}

#[test]
#[should_panic]
fn missing_coefficients() {
    let yaml = "
rhs:
  - [1, 1]
";
    let _ = pose_matrix::loads(yaml).unwrap();
}

#[test]
#[should_panic]
fn rhs_too_long() {
    let yaml = "
coefficients:
  - [1, 0]
  - [0, 1]
rhs:
  - [1, 1, 1]
";
    let _ = pose_matrix::loads(yaml).unwrap();
}

#[test]
#[should_panic]
fn empty_rhs_list() {
    let yaml = "
coefficients:
  - [1, 0]
  - [0, 1]
rhs: []
";
    let _ = pose_matrix::loads(yaml).unwrap();
}

#[test]
#[should_panic]
fn non_numeric_entry() {
    let yaml = "
coefficients:
  - [1, a]
  - [0, 1]
rhs:
  - [1, 1]
";
    let _ = pose_matrix::loads(yaml).unwrap();
}

#[test]
#[should_panic]
fn bad_pivoting_value() {
    let yaml = "
coefficients: [[1]]
rhs: [[1]]
pivoting: Signed
";
    let _ = pose_matrix::loads(yaml).unwrap();
}

#[test]
#[should_panic]
fn unknown_top_level_field() {
    let yaml = "
coefficients: [[1]]
rhs: [[1]]
solution: [[1]]
";
    let _ = pose_matrix::loads(yaml).unwrap();
}
