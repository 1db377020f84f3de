use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{json, Value};

/// JSON schema for a tool's argument type, in the flat shape chat models expect:
/// subschemas inlined, no `$schema`, `title` or `definitions` keys, and
/// `properties`/`required` always present.
pub fn parameters_schema<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.meta_schema = None;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<T>();

    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| json!({}));
    if let Some(object) = value.as_object_mut() {
        object.remove("title");
        object.remove("definitions");
        object.insert("type".to_string(), json!("object"));
        object.entry("properties").or_insert_with(|| json!({}));
        object.entry("required").or_insert_with(|| json!([]));
    }
    value
}
