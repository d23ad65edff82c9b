#[derive(Clone, loginkit::form::FormModel)]
enum LoginStep {
    Credentials,
    Done,
}

fn main() {}
