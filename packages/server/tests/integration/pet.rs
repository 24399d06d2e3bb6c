use serde_json::json;

use pet_server::entity::pet::PetStatus;

use crate::common::{TestApp, routes};

mod pet_creation {
    use super::*;

    #[tokio::test]
    async fn created_pet_resolves_for_its_owner() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app
            .post_with_token(routes::PETS, &json!({"name": "Rex"}), &token)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body.as_object().unwrap().len(), 1, "only id is returned");
        let id = res.id();

        let read = app.get_with_token(&routes::pet(&id), &token).await;
        assert_eq!(read.status, 200);
        assert_eq!(read.body["id"], id);
        assert_eq!(read.body["name"], "Rex");
    }

    #[tokio::test]
    async fn created_pet_is_found_by_nft_id_with_defaults() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let id = app
            .create_pet(
                &token,
                &json!({
                    "name": "Rex",
                    "nftId": "nft-42",
                    "ownerName": "Ana",
                    "ownerId": "DNI123"
                }),
            )
            .await;

        let res = app.get_with_token(&routes::pet_by_nft("nft-42"), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({
                "id": id,
                "name": "Rex",
                "description": "",
                "birthDate": null,
                "nftId": "nft-42",
                "ownerName": "Ana",
                "ownerId": "DNI123"
            })
        );
    }

    #[tokio::test]
    async fn name_and_description_are_trimmed() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let id = app
            .create_pet(
                &token,
                &json!({"name": "  Rex  ", "description": " good boy\n"}),
            )
            .await;

        let res = app.get_with_token(&routes::pet(&id), &token).await;
        assert_eq!(res.body["name"], "Rex");
        assert_eq!(res.body["description"], "good boy");
    }

    #[tokio::test]
    async fn birth_date_is_stored_as_calendar_date() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let id = app
            .create_pet(&token, &json!({"name": "Rex", "birthDate": "2020-05-17"}))
            .await;

        let res = app.get_with_token(&routes::pet(&id), &token).await;
        assert_eq!(res.body["birthDate"], "2020-05-17");
    }

    #[tokio::test]
    async fn cannot_create_a_pet_without_a_name() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app
            .post_with_token(routes::PETS, &json!({"nftId": "nft-1"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["messages"][0]["path"], "name");

        let list = app.get_with_token(routes::PETS, &token).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn all_field_violations_are_reported_together() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app
            .post_with_token(
                routes::PETS,
                &json!({
                    "name": "n".repeat(257),
                    "description": "d".repeat(1025),
                    "nftId": "x".repeat(101),
                    "ownerName": "o".repeat(101),
                    "ownerId": "i".repeat(101)
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        let paths: Vec<&str> = res.body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["path"].as_str().unwrap())
            .collect();
        assert_eq!(
            paths,
            ["name", "description", "nftId", "ownerName", "ownerId"]
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app
            .post_with_token(
                routes::PETS,
                &json!({"name": "Rex", "birthDate": "yesterday"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .post_raw_with_token(routes::PETS, "{not json", &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn requests_without_a_token_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PETS).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let res = app
            .post_without_token(routes::PETS, &json!({"name": "Rex"}))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn requests_with_a_bad_token_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::PETS, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let app = TestApp::spawn().await;
        let forged = pet_server::utils::jwt::sign(
            uuid::Uuid::now_v7(),
            "some-other-secret",
            chrono::Duration::hours(1),
        )
        .unwrap();

        let res = app.get_with_token(routes::PETS, &forged).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn unauthenticated_create_stores_nothing() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        app.post_without_token(routes::PETS, &json!({"name": "Rex"}))
            .await;

        let list = app.get_with_token(routes::PETS, &token).await;
        assert_eq!(list.body, json!([]));
    }
}

mod pet_reads {
    use super::*;

    #[tokio::test]
    async fn list_is_empty_for_a_new_user() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app.get_with_token(routes::PETS, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn list_only_contains_the_callers_pets() {
        let app = TestApp::spawn().await;
        let (_, alice) = app.create_authenticated_user();
        let (_, bob) = app.create_authenticated_user();

        let rex = app.create_pet(&alice, &json!({"name": "Rex"})).await;
        let fido = app.create_pet(&alice, &json!({"name": "Fido"})).await;
        app.create_pet(&bob, &json!({"name": "Tom"})).await;

        let res = app.get_with_token(routes::PETS, &alice).await;

        assert_eq!(res.status, 200);
        let mut ids: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        ids.sort();
        let mut expected = vec![rex.as_str(), fido.as_str()];
        expected.sort();
        assert_eq!(ids, expected);

        let item = &res.body[0];
        for key in [
            "id",
            "name",
            "description",
            "birthDate",
            "nftId",
            "ownerName",
            "ownerId",
        ] {
            assert!(item.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn another_users_pet_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, alice) = app.create_authenticated_user();
        let (_, bob) = app.create_authenticated_user();
        let id = app.create_pet(&alice, &json!({"name": "Rex"})).await;

        let res = app.get_with_token(&routes::pet(&id), &bob).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_pet_id_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app
            .get_with_token(&routes::pet(&uuid::Uuid::now_v7().to_string()), &token)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn malformed_pet_id_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app.get_with_token(&routes::pet("not-a-uuid"), &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn nft_lookup_is_not_limited_to_the_owner() {
        let app = TestApp::spawn().await;
        let (_, alice) = app.create_authenticated_user();
        let (_, bob) = app.create_authenticated_user();
        let id = app
            .create_pet(&alice, &json!({"name": "Rex", "nftId": "nft-7"}))
            .await;

        let res = app.get_with_token(&routes::pet_by_nft("nft-7"), &bob).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["nftId"], "nft-7");
    }

    #[tokio::test]
    async fn nft_lookup_requires_an_exact_match() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        app.create_pet(&token, &json!({"name": "Rex", "nftId": "nft-7"}))
            .await;

        let res = app.get_with_token(&routes::pet_by_nft("nft-"), &token).await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&routes::pet_by_nft("NFT-7"), &token).await;
        assert_eq!(res.status, 404);
    }
}

mod pet_updates {
    use super::*;

    #[tokio::test]
    async fn present_fields_overwrite_and_absent_fields_are_kept() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app
            .create_pet(
                &token,
                &json!({
                    "name": "Rex",
                    "description": "Brown",
                    "nftId": "nft-1",
                    "ownerName": "Ana",
                    "ownerId": "DNI123"
                }),
            )
            .await;

        let res = app
            .post_with_token(
                &routes::pet(&id),
                &json!({
                    "name": "Max",
                    "description": "",
                    "birthDate": "2021-01-02",
                    "ownerName": "Luis"
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({
                "id": id,
                "name": "Max",
                "description": "Brown",
                "birthDate": "2021-01-02",
                "ownerName": "Luis",
                "ownerId": "DNI123"
            })
        );

        let read = app.get_with_token(&routes::pet(&id), &token).await;
        assert_eq!(read.body["nftId"], "nft-1");
    }

    #[tokio::test]
    async fn update_response_omits_nft_id() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app
            .create_pet(&token, &json!({"name": "Rex", "nftId": "nft-1"}))
            .await;

        let res = app
            .post_with_token(&routes::pet(&id), &json!({"nftId": "nft-2"}), &token)
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body.get("nftId").is_none());

        let read = app.get_with_token(&routes::pet_by_nft("nft-2"), &token).await;
        assert_eq!(read.status, 200);
        assert_eq!(read.body["id"], id);
    }

    #[tokio::test]
    async fn invalid_update_changes_nothing() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app
            .create_pet(&token, &json!({"name": "Rex", "description": "Brown"}))
            .await;
        let before = app.stored_pet(&id).await;

        let res = app
            .post_with_token(
                &routes::pet(&id),
                &json!({
                    "name": "n".repeat(257),
                    "description": "d".repeat(1025),
                    "ownerName": "Luis"
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        let messages = res.body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["path"], "name");
        assert_eq!(messages[1]["path"], "description");

        assert_eq!(app.stored_pet(&id).await, before);
    }

    #[tokio::test]
    async fn cannot_update_another_users_pet() {
        let app = TestApp::spawn().await;
        let (_, alice) = app.create_authenticated_user();
        let (_, bob) = app.create_authenticated_user();
        let id = app.create_pet(&alice, &json!({"name": "Rex"})).await;

        let res = app
            .post_with_token(&routes::pet(&id), &json!({"name": "Stolen"}), &bob)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(app.stored_pet(&id).await.name, "Rex");
    }

    #[tokio::test]
    async fn updating_an_unknown_pet_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();

        let res = app
            .post_with_token(
                &routes::pet(&uuid::Uuid::now_v7().to_string()),
                &json!({"name": "Ghost"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn update_refreshes_updated_but_not_created() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app.create_pet(&token, &json!({"name": "Rex"})).await;
        let before = app.stored_pet(&id).await;

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let res = app
            .post_with_token(&routes::pet(&id), &json!({}), &token)
            .await;
        assert_eq!(res.status, 200);

        let after = app.stored_pet(&id).await;
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.user_id, before.user_id);
    }
}

mod pet_removal {
    use super::*;

    #[tokio::test]
    async fn removed_pet_disappears_from_every_read() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app
            .create_pet(&token, &json!({"name": "Rex", "nftId": "nft-9"}))
            .await;

        let res = app.delete_with_token(&routes::pet(&id), &token).await;
        assert_eq!(res.status, 204);
        assert!(res.text.is_empty());

        let list = app.get_with_token(routes::PETS, &token).await;
        assert_eq!(list.body, json!([]));

        let read = app.get_with_token(&routes::pet(&id), &token).await;
        assert_eq!(read.status, 404);

        let by_nft = app.get_with_token(&routes::pet_by_nft("nft-9"), &token).await;
        assert_eq!(by_nft.status, 404);
    }

    #[tokio::test]
    async fn removal_is_a_soft_delete() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app.create_pet(&token, &json!({"name": "Rex"})).await;

        app.delete_with_token(&routes::pet(&id), &token).await;

        let stored = app.stored_pet(&id).await;
        assert_eq!(stored.status, PetStatus::Disabled);
        assert_eq!(stored.name, "Rex");
    }

    #[tokio::test]
    async fn second_removal_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app.create_pet(&token, &json!({"name": "Rex"})).await;

        let first = app.delete_with_token(&routes::pet(&id), &token).await;
        assert_eq!(first.status, 204);

        let second = app.delete_with_token(&routes::pet(&id), &token).await;
        assert_eq!(second.status, 404);
        assert_eq!(second.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn cannot_remove_another_users_pet() {
        let app = TestApp::spawn().await;
        let (_, alice) = app.create_authenticated_user();
        let (_, bob) = app.create_authenticated_user();
        let id = app.create_pet(&alice, &json!({"name": "Rex"})).await;

        let res = app.delete_with_token(&routes::pet(&id), &bob).await;

        assert_eq!(res.status, 404);
        assert_eq!(app.stored_pet(&id).await.status, PetStatus::Active);
    }

    #[tokio::test]
    async fn removed_pet_cannot_be_updated() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_authenticated_user();
        let id = app.create_pet(&token, &json!({"name": "Rex"})).await;
        app.delete_with_token(&routes::pet(&id), &token).await;

        let res = app
            .post_with_token(&routes::pet(&id), &json!({"name": "Back"}), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(app.stored_pet(&id).await.status, PetStatus::Disabled);
    }
}
