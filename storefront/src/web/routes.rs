// storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from main.rs to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    // Cart routes: all require a bearer token. Anonymous cart state lives
    // entirely client-side and only reaches these endpoints through the
    // item-by-item reconciliation replay at login.
    .service(
      web::scope("/cart")
        .route("", web::get().to(cart_handlers::get_cart_handler))
        .route("", web::post().to(cart_handlers::add_to_cart_handler))
        .route("", web::delete().to(cart_handlers::clear_cart_handler))
        .route("/{item_id}", web::put().to(cart_handlers::update_cart_item_handler))
        .route("/{item_id}", web::delete().to(cart_handlers::remove_cart_item_handler)),
    )
    // Order routes. `/myorders` is registered before `/{order_id}` so it
    // matches first.
    .service(
      web::scope("/orders")
        .route("", web::post().to(order_handlers::create_order_handler))
        .route("/myorders", web::get().to(order_handlers::get_my_orders_handler))
        .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
        .route("/{order_id}/pay", web::put().to(order_handlers::mark_paid_handler))
        .route("/{order_id}/deliver", web::put().to(order_handlers::mark_delivered_handler))
        .route("/{order_id}/status", web::put().to(order_handlers::set_status_handler)),
    )
    // Catalog routes.
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
        .route("/{product_id}/reviews", web::post().to(product_handlers::add_review_handler)),
    );
}
