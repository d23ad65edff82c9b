#[derive(Clone, loginkit::form::FormModel)]
struct CredentialsForm<T> {
    secret: T,
}

fn main() {}
