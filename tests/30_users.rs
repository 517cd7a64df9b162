mod common;

use admin_console::forms::{NewUserForm, UserUpdateForm};
use admin_console::SelectionState;
use anyhow::Result;
use serde_json::json;

#[tokio::test]
async fn list_and_show_users() -> Result<()> {
    let backend = common::MockBackend::start().await?;
    let client = backend.logged_in_client()?;

    let users = client.list_users().await?;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].roles[0].name, "admin");
    assert!(users[1].roles.is_empty());

    let user = client.get_user(1).await?;
    assert_eq!(user.email, "admin@example.com");

    let err = client.get_user(7).await.unwrap_err();
    assert_eq!(err.to_string(), "User 7 not found");
    Ok(())
}

#[tokio::test]
async fn create_user_sends_roles() -> Result<()> {
    let backend = common::MockBackend::start().await?;
    let client = backend.logged_in_client()?;

    let form = NewUserForm {
        username: " carol ".into(),
        email: "carol@example.com ".into(),
        password: "s3cret!".into(),
        confirm_password: "s3cret!".into(),
        roles: SelectionState::new().toggle(2).toggle(1),
    };
    client.create_user(&form.to_payload()?).await?;

    assert_eq!(
        backend.last_body("create_user"),
        Some(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "s3cret!",
            "roles": [{ "id": 1 }, { "id": 2 }]
        }))
    );
    Ok(())
}

#[tokio::test]
async fn update_and_delete_user() -> Result<()> {
    let backend = common::MockBackend::start().await?;
    let client = backend.logged_in_client()?;

    let form = UserUpdateForm {
        username: "root".into(),
        email: "root@example.com".into(),
    };
    client.update_user(1, &form.to_payload()?).await?;
    assert_eq!(
        backend.last_body("update_user"),
        Some(json!({ "username": "root", "email": "root@example.com" }))
    );

    client.delete_user(2).await?;
    assert_eq!(backend.deleted(), vec!["user/2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn suppliers_use_bearer_token() -> Result<()> {
    let backend = common::MockBackend::start().await?;

    let suppliers = backend.logged_in_client()?.list_suppliers().await?;
    assert_eq!(suppliers, vec![json!({ "id": 10, "name": "Acme" })]);

    let err = backend.client()?.list_suppliers().await.unwrap_err();
    assert!(err.is_unauthorized());
    Ok(())
}
