use loginkit::form::{FieldLens, FormModel};

#[derive(Clone, loginkit::form::FormModel)]
struct SignupForm {
    display_name: String,
    email: String,
}

fn main() {
    let fields = SignupForm::fields();
    let lens = fields.email();
    let mut model = SignupForm {
        display_name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
    };
    lens.set(&mut model, "robert@example.com".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "robert@example.com");
    assert_eq!(fields.display_name().get(&model), "Bob");

    let keys = SignupForm::field_keys()
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["display_name", "email"]);
}
