use super::*;
use crate::clause::data;
use rusqlite::types::Value;

fn connections_insert() -> InsertBuilder {
    let mut ib = InsertBuilder::new("CONNECTIONS");
    ib.columns(["ID", "AGE", "PHONE", "NAME"])
        .declared_types(["INT", "INT", "INT", "CHAR(50)"]);
    ib
}

#[test]
fn test_create_table() {
    let mut cb = CreateTableBuilder::new("CONNECTIONS");
    cb.field("ID", "INT PRIMARY KEY NOT NULL")
        .field("AGE", "INT NOT NULL")
        .field("PHONE", "INT NULL")
        .field("NAME", &format!("{}(50) {}", data::CHAR, data::NOT_NULL));
    assert_eq!(
        cb.build().unwrap(),
        "CREATE TABLE CONNECTIONS (ID INT PRIMARY KEY NOT NULL, AGE INT NOT NULL, PHONE INT NULL, NAME CHAR(50) NOT NULL);"
    );
    assert_eq!(cb.field_names(), vec!["ID", "AGE", "PHONE", "NAME"]);
}

#[test]
fn test_create_table_from_pairs() {
    let mut cb = CreateTableBuilder::new("T");
    cb.fields([("A", "TEXT"), ("B", "")]);
    assert_eq!(cb.to_sql(), "CREATE TABLE T (A TEXT, B);");
}

#[test]
fn test_create_table_requires_fields() {
    let cb = CreateTableBuilder::new("T");
    assert!(cb.build().unwrap_err().is_validation_error());

    let mut cb = CreateTableBuilder::new("");
    cb.field("A", "INT");
    assert!(cb.validate().is_err());
}

#[test]
fn test_insert_full_record_has_no_column_list() {
    let mut ib = connections_insert();
    ib.values(["1", "32", "665", "ANTHON33"]);
    assert_eq!(
        ib.build().unwrap(),
        "INSERT INTO CONNECTIONS VALUES (1, 32, 665, 'ANTHON33');"
    );
}

#[test]
fn test_sparse_insert_lists_present_columns() {
    let mut ib = connections_insert();
    ib.values(["2", "43", "", "Julia"]);
    assert_eq!(
        ib.build().unwrap(),
        "INSERT INTO CONNECTIONS (ID, AGE, NAME) VALUES (2, 43, 'Julia');"
    );
}

#[test]
fn test_insert_accepts_tagged_values() {
    let mut ib = connections_insert();
    ib.value("3")
        .value(FieldValue::Present("23".into()))
        .value(FieldValue::Omitted)
        .value(Some("Edu"));
    assert_eq!(
        ib.build().unwrap(),
        "INSERT INTO CONNECTIONS (ID, AGE, NAME) VALUES (3, 23, 'Edu');"
    );
}

#[test]
fn test_insert_value_count_mismatch() {
    let mut ib = connections_insert();
    ib.values(["1", "32", "665"]);
    let err = ib.build().unwrap_err();
    assert!(err.is_validation_error());
    assert!(err.to_string().contains("number of values (3)"));
}

#[test]
fn test_insert_type_error_rejects_whole_record() {
    let mut ib = connections_insert();
    ib.values(["1", "3a2", "665", "ANTHON33"]);
    let err = ib.build().unwrap_err();
    assert!(err.is_validation_error());
    assert!(err.to_string().contains("CONNECTIONS.AGE"));
    assert!(err.to_string().contains("INTEGER"));
}

#[test]
fn test_insert_stale_types_are_rejected() {
    let mut ib = InsertBuilder::new("T");
    ib.columns(["A", "B"]).declared_types(["INT"]).values(["1", "2"]);
    assert!(ib.validate().is_err());
}

#[test]
fn test_insert_with_every_value_omitted() {
    let mut ib = connections_insert();
    ib.values(["", "", "", ""]);
    assert!(ib.build().is_err());
}

#[test]
fn test_insert_quotes_blob_and_untyped_columns() {
    let mut ib = InsertBuilder::new("T");
    ib.columns(["A", "B", "C"])
        .declared_types(["", "BLOB", "DECIMAL(10,2)"])
        .values(["x", "y", "3,50"]);
    assert_eq!(ib.to_sql(), "INSERT INTO T VALUES ('x', 'y', 3,50);");
}

#[test]
fn test_insert_bound() {
    let mut ib = connections_insert();
    ib.values(["2", "43", "", "O'Brien"]);
    let (sql, params) = ib.build_bound().unwrap();
    assert_eq!(
        sql,
        "INSERT INTO CONNECTIONS (ID, AGE, NAME) VALUES (?1, ?2, ?3);"
    );
    assert_eq!(
        params,
        vec![
            Value::Integer(2),
            Value::Integer(43),
            Value::Text("O'Brien".into())
        ]
    );
}

#[test]
fn test_insert_bound_converts_real_separators() {
    let mut ib = InsertBuilder::new("T");
    ib.columns(["R", "N"])
        .declared_types(["DOUBLE", "NUMERIC"])
        .values(["33,86", "7"]);
    let (_, params) = ib.build_bound().unwrap();
    assert_eq!(params, vec![Value::Real(33.86), Value::Integer(7)]);
}

#[test]
fn test_insert_bound_still_validates() {
    let mut ib = connections_insert();
    ib.values(["x", "32", "665", "ANTHON33"]);
    assert!(ib.build_bound().is_err());
}

#[test]
fn test_delete_all_omits_where() {
    let mut db = DeleteBuilder::new("CONNECTIONS");
    db.condition(DELETE_ALL);
    assert_eq!(db.build().unwrap(), "DELETE FROM CONNECTIONS;");
}

#[test]
fn test_delete_with_condition() {
    let mut db = DeleteBuilder::new("CONNECTIONS");
    db.condition("ID = 5");
    assert_eq!(db.build().unwrap(), "DELETE FROM CONNECTIONS WHERE ID = 5;");
}

#[test]
fn test_delete_requires_condition() {
    let db = DeleteBuilder::new("CONNECTIONS");
    assert!(db.build().unwrap_err().is_validation_error());

    let mut db = DeleteBuilder::new("CONNECTIONS");
    db.condition("");
    let err = db.build().unwrap_err();
    assert!(err.is_validation_error());
    assert!(err.to_string().contains("no condition given"));

    let mut db = DeleteBuilder::new("CONNECTIONS");
    db.allow_delete_all(true);
    assert_eq!(db.build().unwrap(), "DELETE FROM CONNECTIONS;");
}

#[test]
fn test_drop_table() {
    assert_eq!(
        DropTableBuilder::new("CONNECTIONS").build().unwrap(),
        "DROP TABLE CONNECTIONS;"
    );
    assert!(DropTableBuilder::new(" ").build().is_err());
}

#[test]
fn test_update_quotes_by_value_shape() {
    let mut ub = UpdateBuilder::new("CONNECTIONS");
    ub.set("AGE", "44")
        .set("PHONE", "NULL")
        .set("NAME", "Julia M")
        .set("SCORE", "4,5")
        .condition("ID = 2");
    assert_eq!(
        ub.build().unwrap(),
        "UPDATE CONNECTIONS SET AGE = 44, PHONE = NULL, NAME = 'Julia M', SCORE = 4,5 WHERE ID = 2;"
    );
}

#[test]
fn test_update_without_condition() {
    let mut ub = UpdateBuilder::new("T");
    ub.set_all([("A", "x")]);
    assert_eq!(ub.build().unwrap(), "UPDATE T SET A = 'x';");
}

#[test]
fn test_update_requires_set() {
    let ub = UpdateBuilder::new("T");
    assert!(ub.build().unwrap_err().is_validation_error());
}

#[test]
fn test_select_all() {
    let mut sb = SelectBuilder::new(SelectSpec::new("CONNECTIONS"));
    sb.table_width(4);
    assert_eq!(sb.build().unwrap(), "SELECT * FROM CONNECTIONS;");
    assert_eq!(sb.column_indexes(), vec![0, 1, 2, 3]);
}

#[test]
fn test_select_explicit_fields() {
    let spec = SelectSpec::new("CONNECTIONS")
        .fields(["NAME", "AGE"])
        .distinct(true);
    let mut sb = SelectBuilder::new(spec);
    sb.table_width(4);
    assert_eq!(
        sb.build().unwrap(),
        "SELECT DISTINCT NAME, AGE FROM CONNECTIONS;"
    );
    assert_eq!(sb.column_indexes(), vec![0, 1]);
}

#[test]
fn test_select_clause_order() {
    let spec = SelectSpec::new("CONNECTIONS")
        .where_cond("AGE > 1")
        .group_by(["NAME"])
        .having("count(name) < 2")
        .order_by(["SUM(AGE)"])
        .order_type("desc")
        .limit(1)
        .offset(1);
    let sb = SelectBuilder::new(spec);
    assert_eq!(
        sb.build().unwrap(),
        "SELECT * FROM CONNECTIONS WHERE AGE > 1 GROUP BY NAME HAVING count(name) < 2 ORDER BY SUM(AGE) DESC LIMIT 1 OFFSET 1;"
    );
}

#[test]
fn test_select_non_positive_limits_are_dropped() {
    let spec = SelectSpec::new("T").limit(0).offset(-3);
    assert_eq!(SelectBuilder::new(spec).build().unwrap(), "SELECT * FROM T;");
}

#[test]
fn test_select_invalid_order_rejects_statement() {
    let spec = SelectSpec::new("T").order_by(["A"]).order_type("UP");
    let err = SelectBuilder::new(spec).build().unwrap_err();
    assert!(err.is_validation_error());

    // Checked even without ORDER BY columns.
    let spec = SelectSpec::new("T").order_type("sideways");
    assert!(SelectBuilder::new(spec).build().is_err());
}

#[test]
fn test_select_rejects_empty_field_list() {
    let spec = SelectSpec::new("T").fields(Vec::<String>::new());
    assert!(SelectBuilder::new(spec).validate().is_err());
}

#[test]
fn test_projection_wildcard_detection() {
    assert_eq!(Projection::from_fields(["*"]), Projection::All);
    assert_eq!(
        Projection::from_fields(["*", "ID"]),
        Projection::Columns(vec!["*".into(), "ID".into()])
    );
}
