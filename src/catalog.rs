use crate::models::Product;

/// Pure view transform over the full product list: category filter and
/// free-text search compose as an intersection, then the sort mode is applied
/// to the combined result.
pub fn apply_view(
    products: &[Product],
    category: Option<&str>,
    search: Option<&str>,
    sort: Option<&str>,
) -> Vec<Product> {
    let category = category
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"));
    let search = search
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase);

    let mut view: Vec<Product> = products
        .iter()
        .filter(|product| match category {
            Some(wanted) => product.category.eq_ignore_ascii_case(wanted),
            None => true,
        })
        .filter(|product| match &search {
            Some(term) => matches_search(product, term),
            None => true,
        })
        .cloned()
        .collect();

    match sort.unwrap_or_default() {
        "price-low" => view.sort_by(|a, b| a.price.total_cmp(&b.price)),
        "price-high" => view.sort_by(|a, b| b.price.total_cmp(&a.price)),
        "name" => view.sort_by(|a, b| {
            a.product_name
                .to_lowercase()
                .cmp(&b.product_name.to_lowercase())
        }),
        // Default keeps the filtered order.
        _ => {}
    }

    view
}

fn matches_search(product: &Product, term: &str) -> bool {
    product.product_name.to_lowercase().contains(term)
        || product.description.to_lowercase().contains(term)
        || product.category.to_lowercase().contains(term)
}

pub fn find_product(products: &[Product], product_id: i64) -> Option<&Product> {
    products.iter().find(|p| p.product_id == product_id)
}

fn demo(
    product_id: i64,
    product_name: &str,
    description: &str,
    price: f64,
    stock: u32,
    category: &str,
    status: &str,
) -> Product {
    Product {
        product_id,
        product_name: product_name.to_string(),
        description: description.to_string(),
        price,
        stock,
        category: category.to_string(),
        image_url: String::new(),
        status: status.to_string(),
    }
}

/// The built-in menu rendered when the backend is unreachable, so the page
/// degrades to a usable demo rather than going blank.
pub fn demo_products() -> Vec<Product> {
    vec![
        demo(1, "Classic Margherita Pizza", "Fresh mozzarella, tomato sauce, and basil on a crispy thin crust", 12.99, 50, "appetizer", "available"),
        demo(2, "Pepperoni Pizza", "Classic pepperoni with extra cheese and Italian spices", 14.99, 45, "appetizer", "available"),
        demo(3, "Caesar Salad", "Romaine lettuce, parmesan cheese, croutons, and Caesar dressing", 8.99, 50, "appetizer", "available"),
        demo(4, "Greek Salad", "Fresh tomatoes, cucumber, feta cheese, olives, and olive oil", 9.99, 45, "appetizer", "available"),
        demo(5, "Buffalo Wings", "Crispy chicken wings tossed in spicy buffalo sauce", 11.99, 35, "appetizer", "available"),
        demo(6, "Classic Cheeseburger", "Angus beef patty, cheddar cheese, lettuce, tomato, and special sauce", 10.99, 60, "main_course", "available"),
        demo(7, "Bacon Deluxe Burger", "Double beef patty, crispy bacon, swiss cheese, and caramelized onions", 13.99, 35, "main_course", "available"),
        demo(8, "Veggie Burger", "Plant-based patty, avocado, sprouts, and chipotle mayo", 11.99, 25, "main_course", "available"),
        demo(9, "Tonkotsu Ramen", "Rich pork bone broth, chashu pork, soft-boiled egg, and noodles", 13.99, 40, "main_course", "available"),
        demo(10, "Spicy Miso Ramen", "Miso broth with chili oil, ground pork, and fresh vegetables", 14.99, 30, "main_course", "available"),
        demo(11, "Pad Thai", "Stir-fried rice noodles with shrimp, peanuts, and tamarind sauce", 12.99, 35, "main_course", "available"),
        demo(12, "Quinoa Power Bowl", "Quinoa, roasted vegetables, chickpeas, and tahini dressing", 11.99, 6, "main_course", "available"),
        demo(13, "Grilled Salmon", "Fresh Atlantic salmon with lemon butter sauce and vegetables", 18.99, 20, "main_course", "available"),
        demo(14, "Chocolate Lava Cake", "Warm chocolate cake with a molten center, served with vanilla ice cream", 6.99, 20, "dessert", "available"),
        demo(15, "Tiramisu", "Classic Italian dessert with coffee-soaked ladyfingers and mascarpone", 7.99, 15, "dessert", "available"),
        demo(16, "New York Cheesecake", "Creamy cheesecake with graham cracker crust and berry compote", 7.99, 18, "dessert", "available"),
        demo(17, "Ice Cream Sundae", "Three scoops of ice cream with chocolate sauce, whipped cream, and cherry", 4.99, 50, "dessert", "available"),
        demo(18, "Fresh Lemonade", "Freshly squeezed lemon juice with a hint of mint", 3.99, 100, "beverage", "available"),
        demo(19, "Iced Coffee", "Cold brew coffee with your choice of milk", 4.99, 80, "beverage", "available"),
        demo(20, "Mango Smoothie", "Fresh mango blended with yogurt and honey", 5.99, 0, "beverage", "unavailable"),
        demo(21, "Green Tea", "Premium Japanese green tea, served hot or iced", 3.49, 120, "beverage", "available"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_is_case_insensitive() {
        let products = demo_products();
        let view = apply_view(&products, Some("DESSERT"), None, None);
        assert!(!view.is_empty());
        assert!(view.iter().all(|p| p.category == "dessert"));
    }

    #[test]
    fn all_category_is_a_passthrough() {
        let products = demo_products();
        let view = apply_view(&products, Some("all"), None, None);
        assert_eq!(view.len(), products.len());
    }

    #[test]
    fn search_covers_name_description_and_category() {
        let products = demo_products();

        let by_name = apply_view(&products, None, Some("ramen"), None);
        assert_eq!(by_name.len(), 2);

        let by_description = apply_view(&products, None, Some("tamarind"), None);
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].product_name, "Pad Thai");

        let by_category = apply_view(&products, None, Some("beverage"), None);
        assert_eq!(by_category.len(), 4);
    }

    #[test]
    fn category_and_search_compose() {
        let products = demo_products();
        let view = apply_view(&products, Some("main_course"), Some("burger"), None);
        assert_eq!(view.len(), 3);
        assert!(view.iter().all(|p| p.category == "main_course"));
    }

    #[test]
    fn sort_modes_order_the_view() {
        let products = demo_products();

        let cheap_first = apply_view(&products, None, None, Some("price-low"));
        assert!(cheap_first.windows(2).all(|w| w[0].price <= w[1].price));

        let dear_first = apply_view(&products, None, None, Some("price-high"));
        assert!(dear_first.windows(2).all(|w| w[0].price >= w[1].price));

        let by_name = apply_view(&products, None, None, Some("name"));
        assert!(by_name
            .windows(2)
            .all(|w| w[0].product_name.to_lowercase() <= w[1].product_name.to_lowercase()));
    }

    #[test]
    fn demo_menu_keeps_its_shape() {
        let products = demo_products();
        assert_eq!(products.len(), 21);

        let smoothie = find_product(&products, 20).unwrap();
        assert!(!smoothie.is_available());
        assert!(!smoothie.is_in_stock());

        let quinoa = find_product(&products, 12).unwrap();
        assert!(quinoa.is_low_stock());
    }
}
