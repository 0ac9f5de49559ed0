//! Plain-text rendering of storefront data.
//!
//! Everything writes to a caller-supplied `Write` so commands can hold one
//! locked stdout handle and tests can render into a buffer.

use std::io::{self, Write};

use shopez_core::{Cart, CartLine, CartTotals, Order, Product, User};
use shopez_storefront::gateway::AdminOrder;

const STAR_COUNT: u8 = 5;

/// `★★★☆☆`-style rating bar.
fn stars(product: &Product) -> String {
    let filled = product.rating.filled_stars();
    (0..STAR_COUNT)
        .map(|i| if i < filled { '★' } else { '☆' })
        .collect()
}

pub fn product_list(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    for product in products {
        writeln!(
            out,
            "{:<10} {:>10}  {} ({})  [{}]",
            product.id.as_str(),
            product.price.to_string(),
            product.title,
            product.rating.count,
            product.category,
        )?;
    }
    writeln!(out, "{} product(s)", products.len())
}

pub fn product_detail(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(out, "{}", product.title)?;
    writeln!(out, "  id:       {}", product.id)?;
    writeln!(out, "  price:    {}", product.price)?;
    writeln!(out, "  category: {}", product.category)?;
    writeln!(
        out,
        "  rating:   {} {:.1} ({} reviews)",
        stars(product),
        product.rating.rate,
        product.rating.count
    )?;
    if !product.image.is_empty() {
        writeln!(out, "  image:    {}", product.image)?;
    }
    if !product.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", product.description)?;
    }
    Ok(())
}

pub fn categories(out: &mut impl Write, categories: &[String]) -> io::Result<()> {
    for category in categories {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

pub fn user(out: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(out, "{} <{}> (id {})", user.name, user.email, user.id)
}

pub fn users(out: &mut impl Write, users: &[User]) -> io::Result<()> {
    for u in users {
        user(out, u)?;
    }
    writeln!(out, "{} user(s)", users.len())
}

fn cart_line(out: &mut impl Write, line: &CartLine) -> io::Result<()> {
    writeln!(
        out,
        "  {} x{}  {}",
        line.title,
        line.quantity,
        line.line_total()
    )
}

/// Cart lines followed by the derived totals.
pub fn cart(out: &mut impl Write, cart: &Cart, totals: &CartTotals) -> io::Result<()> {
    for line in cart.lines() {
        cart_line(out, line)?;
    }
    writeln!(out, "  subtotal: {}", totals.subtotal)?;
    writeln!(out, "  shipping: {}", totals.shipping)?;
    writeln!(out, "  tax:      {}", totals.tax)?;
    writeln!(out, "  total:    {}", totals.total)
}

fn order_header(out: &mut impl Write, order: &Order) -> io::Result<()> {
    writeln!(
        out,
        "Order #{}  {}  {}  {} item(s)  {}",
        order.order_number,
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.status,
        order.item_count(),
        order.total,
    )
}

pub fn order_list(out: &mut impl Write, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders yet.");
    }
    for order in orders {
        order_header(out, order)?;
    }
    Ok(())
}

/// Order with items, address and the milestones its status implies.
pub fn order_detail(out: &mut impl Write, order: &Order) -> io::Result<()> {
    order_header(out, order)?;
    writeln!(out, "  id: {}", order.id)?;

    writeln!(out, "Items:")?;
    for item in &order.items {
        cart_line(out, item)?;
    }

    let address = &order.shipping_address;
    writeln!(out, "Ship to:")?;
    writeln!(out, "  {}", address.recipient())?;
    writeln!(out, "  {}", address.address)?;
    writeln!(out, "  {}, {} {}", address.city, address.state, address.zip_code)?;
    writeln!(out, "  {}", address.country)?;
    writeln!(out, "Payment: {}", order.payment_method)?;

    writeln!(out, "Progress:")?;
    writeln!(out, "  placed")?;
    if order.status.is_cancelled() {
        return writeln!(out, "  cancelled");
    }
    if order.status.is_confirmed() {
        writeln!(out, "  confirmed")?;
    }
    if order.status.has_shipped() {
        writeln!(out, "  shipped")?;
    }
    if order.status.is_delivered() {
        writeln!(out, "  delivered")?;
    }
    Ok(())
}

pub fn admin_orders(out: &mut impl Write, orders: &[AdminOrder]) -> io::Result<()> {
    for AdminOrder {
        order,
        purchaser_name,
    } in orders
    {
        writeln!(
            out,
            "#{}  {:<20}  {:>10}  {:<10}  {}  {} item(s)",
            order.order_number,
            purchaser_name.as_deref().unwrap_or("N/A"),
            order.total.to_string(),
            order.status.as_str(),
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.items.len(),
        )?;
    }
    writeln!(out, "{} order(s)", orders.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopez_core::{
        Email, OrderId, OrderStatus, PaymentMethod, Price, ProductId, Rating,
        ShippingAddress, UserId,
    };

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("1"),
            title: "Gold Ring".to_string(),
            price: Price::from_cents(16800),
            image: String::new(),
            category: "jewelery".to_string(),
            rating: Rating {
                rate: 3.9,
                count: 70,
            },
            description: "A ring.".to_string(),
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_product_detail_stars() {
        let text = render(|out| product_detail(out, &product()));
        assert!(text.contains("★★★☆☆ 3.9 (70 reviews)"));
        assert!(text.contains("$168.00"));
    }

    #[test]
    fn test_empty_product_list() {
        let text = render(|out| product_list(out, &[]));
        assert_eq!(text, "No products found.\n");
    }

    #[test]
    fn test_user_line() {
        let u = User {
            id: UserId::new("u1"),
            name: "Ada Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
        };
        assert_eq!(
            render(|out| user(out, &u)),
            "Ada Lovelace <ada@example.com> (id u1)\n"
        );
    }

    #[test]
    fn test_order_detail_milestones() {
        let mut cart = Cart::new();
        cart.add(&product(), 2);
        let order = Order {
            id: OrderId::new("o1"),
            order_number: "SE123456".to_string(),
            created_at: chrono::DateTime::UNIX_EPOCH,
            status: OrderStatus::Shipped,
            items: cart.lines().to_vec(),
            total: cart.totals().total,
            shipping_address: ShippingAddress::default(),
            payment_method: PaymentMethod::default(),
            user_id: None,
        };

        let text = render(|out| order_detail(out, &order));
        assert!(text.contains("Gold Ring x2  $336.00"));
        assert!(text.contains("  confirmed\n  shipped\n"));
        assert!(!text.contains("delivered"));
    }

    #[test]
    fn test_cart_totals() {
        let mut c = Cart::new();
        c.add(&product(), 1);
        let text = render(|out| cart(out, &c, &c.totals()));
        assert!(text.contains("  Gold Ring x1  $168.00\n"));
        assert!(text.contains("  shipping: $9.99\n"));
        assert!(text.contains("  tax:      $13.44\n"));
        assert!(text.contains("  total:    $191.43\n"));
    }
}
