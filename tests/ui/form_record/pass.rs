use calmform::form::FormRecord;
use calmform::value::ExternalValue;

#[derive(Clone, calmform::form::FormRecord)]
struct Subscriber {
    name: String,
    #[form(rename = "newsletter")]
    subscribed: bool,
    born_at: Option<i64>,
}

fn main() {
    let record = Subscriber {
        name: "Ada".to_string(),
        subscribed: true,
        born_at: None,
    };
    let values = record.to_values();
    assert_eq!(values.get("newsletter"), Some(&ExternalValue::Bool(true)));
    assert_eq!(values.get("born_at"), Some(&ExternalValue::Null));

    let restored = Subscriber::from_values(&values);
    assert_eq!(restored.name, "Ada");
    assert!(restored.subscribed);
    assert_eq!(restored.born_at, None);
}
