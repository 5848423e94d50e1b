//! Order persistence against a real database
//!
//! Exercises the path the in-memory double cannot reach: the cart upsert SQL,
//! the transactional order write (order row + line items + cart clear), its
//! rollback on failure, and the history join. Each test connects via
//! `DATABASE_URL` and skips when it is not set.

use noctura_store::cart::PgCartStore;
use noctura_store::db::orders::{self, NewOrder, NewOrderLine};
use noctura_store::services::cart::CartService;
use noctura_store::services::orders::{CreateOrderRequest, OrderLineInput, ShippingInfo, create_order};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.expect("connect test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

async fn seed_product(pool: &PgPool, name: &str, price: Decimal, stock: i32) -> Uuid {
    let slug = format!("it-{}", Uuid::new_v4());
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO products (slug, name, description, price, category, stock)
        VALUES ($1, $2, 'integration seed', $3, 'robes', $4)
        RETURNING id
        "#,
    )
    .bind(&slug)
    .bind(name)
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("seed product");
    id
}

fn shipping() -> ShippingInfo {
    ShippingInfo {
        full_name: Some("Integration Shopper".into()),
        email: Some("shopper@example.com".into()),
        address: Some("1 Test Lane".into()),
        city: Some("Testville".into()),
        state: Some("TS".into()),
        zip_code: Some("00001".into()),
        ..Default::default()
    }
}

fn order_request(product_id: Uuid, price: Decimal, quantity: i32) -> CreateOrderRequest {
    let subtotal = price * Decimal::from(quantity);
    CreateOrderRequest {
        cart_items: vec![OrderLineInput {
            product_id,
            product_name: "Test Robe".into(),
            product_price: price,
            quantity,
            selected_color: Some("Ivory".into()),
            selected_size: Some("M".into()),
        }],
        shipping_info: shipping(),
        subtotal,
        shipping: dec!(5.00),
        tax: dec!(2.50),
        total: subtotal + dec!(7.50),
    }
}

#[tokio::test]
async fn successful_order_clears_the_cart() {
    let Some(pool) = test_pool().await else { return };
    let user = Uuid::new_v4();
    let product_id = seed_product(&pool, "Test Robe", dec!(20.00), 10).await;
    let cart = CartService::new(PgCartStore::new(pool.clone()));

    // Two adds for the same variant exercise the upsert's conflict path.
    cart.add_item(user, product_id, 2, Some("Ivory"), Some("M"))
        .await
        .unwrap();
    let line = cart
        .add_item(user, product_id, 1, Some("Ivory"), Some("M"))
        .await
        .unwrap();
    assert_eq!(line.quantity, 3);

    let order = create_order(&pool, user, order_request(product_id, dec!(20.00), 3))
        .await
        .unwrap();
    assert!(order.order_number.starts_with("NC-"));
    assert_eq!(order.total, dec!(67.50));

    let view = cart.get_cart(user).await.unwrap();
    assert!(view.items.is_empty());
}

#[tokio::test]
async fn failed_line_insert_rolls_back_order_and_keeps_cart() {
    let Some(pool) = test_pool().await else { return };
    let user = Uuid::new_v4();
    let product_id = seed_product(&pool, "Test Robe", dec!(20.00), 10).await;
    let cart = CartService::new(PgCartStore::new(pool.clone()));
    cart.add_item(user, product_id, 2, None, None).await.unwrap();

    let order = NewOrder {
        user_id: user,
        order_number: format!("NC-IT-{}", Uuid::new_v4().simple()),
        subtotal: dec!(40.00),
        shipping: dec!(0.00),
        tax: dec!(0.00),
        total: dec!(40.00),
        shipping_name: "Integration Shopper".into(),
        shipping_email: "shopper@example.com".into(),
        shipping_address: "1 Test Lane".into(),
        shipping_city: "Testville".into(),
        shipping_state: "TS".into(),
        shipping_zip: "00001".into(),
        shipping_country: "United States".into(),
    };
    // Zero quantity violates the order_items check constraint, so the line
    // insert fails after the order row was written.
    let lines = vec![NewOrderLine {
        product_id,
        product_name: "Test Robe".into(),
        product_price: dec!(20.00),
        quantity: 0,
        selected_color: String::new(),
        selected_size: String::new(),
        subtotal: Decimal::ZERO,
    }];

    orders::create(&pool, &order, &lines).await.unwrap_err();

    // No orphaned order row, and the cart survived.
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE order_number = $1")
        .bind(&order.order_number)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let view = cart.get_cart(user).await.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].item.quantity, 2);
}

#[tokio::test]
async fn history_keeps_snapshots_frozen_and_nests_the_live_product() {
    let Some(pool) = test_pool().await else { return };
    let user = Uuid::new_v4();
    let product_id = seed_product(&pool, "Test Robe", dec!(20.00), 10).await;
    let cart = CartService::new(PgCartStore::new(pool.clone()));
    cart.add_item(user, product_id, 2, None, None).await.unwrap();

    create_order(&pool, user, order_request(product_id, dec!(20.00), 2))
        .await
        .unwrap();

    // Catalog edit after the purchase.
    sqlx::query("UPDATE products SET name = 'Renamed Robe', price = $1 WHERE id = $2")
        .bind(dec!(99.00))
        .bind(product_id)
        .execute(&pool)
        .await
        .unwrap();

    let history = orders::list_for_user(&pool, user).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].items.len(), 1);

    let line = &history[0].items[0];
    // Snapshot fields are untouched by the edit.
    assert_eq!(line.item.product_name, "Test Robe");
    assert_eq!(line.item.product_price, dec!(20.00));
    assert_eq!(line.item.subtotal, dec!(40.00));
    // The nested live product shows the current catalog state.
    let live = line.product.as_ref().unwrap();
    assert_eq!(live.name, "Renamed Robe");
    assert_eq!(live.price, dec!(99.00));
}
