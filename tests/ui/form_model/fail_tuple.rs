#[derive(Clone, loginkit::form::FormModel)]
struct TokenForm(String);

fn main() {}
