use bindery_config::json_schema;

#[test]
fn schema_covers_every_section() {
    let schema = serde_json::to_value(json_schema()).expect("schema should serialize");

    assert_eq!(schema["title"], "bindery.toml");
    let properties = schema["properties"]
        .as_object()
        .expect("root schema should list properties");
    assert!(properties.contains_key("logging"));
    assert!(properties.contains_key("resolution"));
    assert_eq!(schema["additionalProperties"], false);

    let resolution = &schema["definitions"]["ResolutionConfig"]["properties"];
    assert_eq!(resolution["max_type_depth"]["minimum"].as_f64(), Some(1.0));
    assert!(resolution.get("box_primitives").is_some());
}
