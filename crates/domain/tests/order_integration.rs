//! Integration tests for order assembly.
//!
//! These tests run the full create/find/delete cycle against in-memory
//! stores, with the catalog and customer created through their services.

use std::sync::Arc;

use chrono::NaiveDate;
use common::{CategoryDto, CustomerDto, ItemDto, Money, OrderDto, OrderLineDto, ProductDto};
use domain::{ErrorKind, FixedClock, Order, OrderLine, ServiceError, Services, Stores};
use store::InMemoryAggregateRepository;

struct World {
    services: Services,
    orders: InMemoryAggregateRepository<Order, OrderLine>,
}

/// Catalog and customer of the reference scenario, clock pinned to June 2017.
async fn world() -> World {
    let orders = InMemoryAggregateRepository::new();
    let stores = Stores {
        orders: Arc::new(orders.clone()),
        ..Stores::in_memory()
    };
    let clock = FixedClock::new(NaiveDate::from_ymd_opt(2017, 6, 15).unwrap());
    let services = Services::new(stores, Arc::new(clock));

    services
        .catalog
        .create_category(CategoryDto::new("cat42", "name42", "description42"))
        .await
        .unwrap();
    services
        .catalog
        .create_product(ProductDto::new("prod42", "name42", "description42", "cat42"))
        .await
        .unwrap();
    services
        .catalog
        .create_item(ItemDto::new(
            "item42",
            "name42",
            Money::from_units(42),
            "prod42",
        ))
        .await
        .unwrap();
    services
        .customers
        .create_customer(CustomerDto::new("custo42", "firstname42", "lastname42"))
        .await
        .unwrap();

    World { services, orders }
}

fn order_dto() -> OrderDto {
    OrderDto {
        first_name: "firstname42".to_string(),
        last_name: "lastname42".to_string(),
        street1: "street142".to_string(),
        street2: "street242".to_string(),
        city: "city42".to_string(),
        state: "state42".to_string(),
        zip_code: "zipcode42".to_string(),
        country: "country42".to_string(),
        customer_id: "custo42".to_string(),
        order_lines: vec![
            OrderLineDto::new(42, "item42"),
            OrderLineDto::new(42, "item42"),
        ],
        ..Default::default()
    }
}

async fn assert_nothing_persisted(world: &World) {
    assert!(world.orders.is_empty().await);
    assert_eq!(world.orders.child_count().await, 0);
}

mod scenario {
    use super::*;

    #[tokio::test]
    async fn visa_order_is_created_with_priced_lines() {
        let world = world().await;
        let dto = order_dto().with_credit_card("Visa", "4564 1231 4564 1222", "10/18");

        let created = world.services.orders.create_order(dto.clone()).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.order_lines.len(), 2);
        for line in &created.order_lines {
            assert_eq!(line.quantity, 42);
            assert_eq!(line.unit_price, Money::from_units(42));
            assert_eq!(line.item_id, "item42");
        }

        let found = world.services.orders.find_order(&created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.first_name, dto.first_name);
        assert_eq!(found.street2, dto.street2);
        assert_eq!(found.country, dto.country);
        assert_eq!(found.credit_card_number, dto.credit_card_number);
    }

    #[tokio::test]
    async fn expired_card_is_rejected() {
        let world = world().await;
        let dto = order_dto().with_credit_card("Visa", "4564 1231 4564 1222", "10/02");

        let err = world.services.orders.create_order(dto).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Check);
        assert_nothing_persisted(&world).await;
    }

    #[tokio::test]
    async fn invalid_visa_number_is_rejected() {
        let world = world().await;
        let dto = order_dto().with_credit_card("Visa", "4564 1231 4564 1111", "10/18");

        let err = world.services.orders.create_order(dto).await.unwrap_err();
        match err {
            ServiceError::Check(check) => assert_eq!(check.field, "credit_card_number"),
            other => panic!("expected check error, got {other:?}"),
        }
        assert_nothing_persisted(&world).await;
    }

    #[tokio::test]
    async fn empty_card_means_alternate_payment() {
        let world = world().await;
        let dto = order_dto().with_credit_card("", "", "");

        let created = world.services.orders.create_order(dto).await.unwrap();
        assert!(created.credit_card_type.is_empty());
        assert_eq!(world.orders.len().await, 1);
    }

    #[tokio::test]
    async fn deleted_order_is_not_found() {
        let world = world().await;
        let created = world
            .services
            .orders
            .create_order(order_dto())
            .await
            .unwrap();

        world.services.orders.delete_order(&created.id).await.unwrap();

        let err = world
            .services
            .orders
            .find_order(&created.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ObjectNotFound);
        assert_nothing_persisted(&world).await;
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn find_with_empty_or_unknown_id_is_not_found() {
        let world = world().await;
        for id in ["", "   ", "unknown"] {
            let err = world.services.orders.find_order(id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ObjectNotFound, "id {id:?}");
        }
    }

    #[tokio::test]
    async fn empty_order_fails_check() {
        let world = world().await;
        let err = world
            .services
            .orders
            .create_order(OrderDto::default())
            .await
            .unwrap_err();
        match err {
            ServiceError::Check(check) => assert_eq!(check.field, "first_name"),
            other => panic!("expected check error, got {other:?}"),
        }
        assert_nothing_persisted(&world).await;
    }

    #[tokio::test]
    async fn partially_filled_card_is_validated() {
        let world = world().await;
        let dto = order_dto().with_credit_card("Visa", "", "");

        let err = world.services.orders.create_order(dto).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Check);
        assert_nothing_persisted(&world).await;
    }

    #[tokio::test]
    async fn store_failure_leaves_no_partial_aggregate() {
        let world = world().await;
        world.orders.set_fail_writes(true);

        let err = world
            .services
            .orders
            .create_order(order_dto())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Create);
        assert_nothing_persisted(&world).await;

        world.orders.set_fail_writes(false);
        world
            .services
            .orders
            .create_order(order_dto())
            .await
            .unwrap();
        assert_eq!(world.orders.child_count().await, 2);
    }

    #[tokio::test]
    async fn failed_delete_leaves_order_intact() {
        let world = world().await;
        let created = world
            .services
            .orders
            .create_order(order_dto())
            .await
            .unwrap();

        world.orders.set_fail_writes(true);
        let err = world
            .services
            .orders
            .delete_order(&created.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remove);

        world.orders.set_fail_writes(false);
        let found = world.services.orders.find_order(&created.id).await.unwrap();
        assert_eq!(found.order_lines.len(), 2);
    }

    #[tokio::test]
    async fn update_of_unknown_order_leaves_store_unchanged() {
        let world = world().await;
        let mut dto = order_dto();
        dto.id = "ghost".to_string();

        let err = world.services.orders.update_order(dto).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Check);
        assert_nothing_persisted(&world).await;
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_ids() {
        let world = world().await;
        let orders = world.services.orders.clone();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let orders = orders.clone();
                tokio::spawn(async move { orders.create_order(order_dto()).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 16);
        assert_eq!(world.orders.len().await, 16);
        assert_eq!(world.orders.child_count().await, 32);
    }
}
