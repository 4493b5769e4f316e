use domain::cakes::{CustomizableOptions, NewCake};

pub const ADMIN_NAME: &str = "Admin User";

struct Sample {
    name: &'static str,
    description: &'static str,
    price: f64,
    image: &'static str,
    category: &'static str,
    sizes: &'static [&'static str],
    flavors: &'static [&'static str],
    can_add_message: bool,
    featured: bool,
}

const SAMPLES: [Sample; 6] = [
    Sample {
        name: "Classic Chocolate Dream",
        description: "Rich, moist chocolate layers with silky ganache frosting, topped with fresh berries and gold dust.",
        price: 65.0,
        image: "/cake-chocolate.jpg",
        category: "birthday",
        sizes: &["6 inch", "8 inch", "10 inch"],
        flavors: &["Dark Chocolate", "Milk Chocolate", "Double Chocolate"],
        can_add_message: true,
        featured: true,
    },
    Sample {
        name: "Vanilla Blossom",
        description: "Light and fluffy vanilla cake with buttercream frosting, decorated with edible flowers and gold leaf.",
        price: 55.0,
        image: "/cake-vanilla.jpg",
        category: "birthday",
        sizes: &["6 inch", "8 inch", "10 inch"],
        flavors: &["French Vanilla", "Madagascar Vanilla", "Vanilla Bean"],
        can_add_message: true,
        featured: true,
    },
    Sample {
        name: "Red Velvet Romance",
        description: "Stunning red velvet layers with cream cheese frosting, perfect for romantic celebrations.",
        price: 70.0,
        image: "/cake-red-velvet.jpg",
        category: "custom",
        sizes: &["6 inch", "8 inch", "10 inch", "12 inch"],
        flavors: &["Classic Red Velvet", "Blue Velvet", "Pink Velvet"],
        can_add_message: true,
        featured: true,
    },
    Sample {
        name: "Strawberry Shortcake Bliss",
        description: "Fresh strawberries layered with whipped cream and light sponge cake, dusted with powdered sugar.",
        price: 60.0,
        image: "/cake-strawberry.jpg",
        category: "seasonal",
        sizes: &["6 inch", "8 inch"],
        flavors: &["Classic Strawberry", "Strawberry Lemon", "Mixed Berry"],
        can_add_message: true,
        featured: false,
    },
    Sample {
        name: "Elegant Wedding Tier",
        description: "Sophisticated multi-tier wedding cake with intricate lace patterns and sugar flowers.",
        price: 350.0,
        image: "/cake-wedding.jpg",
        category: "wedding",
        sizes: &["3 tier", "4 tier", "5 tier"],
        flavors: &["Vanilla", "Champagne", "Lemon", "Chocolate"],
        can_add_message: false,
        featured: true,
    },
    Sample {
        name: "Rainbow Celebration",
        description: "Colorful rainbow layers with vanilla buttercream, covered in sprinkles and topped with candles.",
        price: 75.0,
        image: "/cake-birthday.jpg",
        category: "birthday",
        sizes: &["6 inch", "8 inch", "10 inch"],
        flavors: &["Vanilla Rainbow", "Chocolate Rainbow", "Funfetti"],
        can_add_message: true,
        featured: true,
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn sample_cakes() -> Vec<NewCake> {
    SAMPLES
        .iter()
        .map(|sample| NewCake {
            name: Some(sample.name.into()),
            description: Some(sample.description.into()),
            price: Some(sample.price),
            image: Some(sample.image.into()),
            category: Some(sample.category.into()),
            customizable_options: Some(CustomizableOptions {
                sizes: owned(sample.sizes),
                flavors: owned(sample.flavors),
                can_add_message: sample.can_add_message,
            }),
            featured: Some(sample.featured),
            available: Some(true),
        })
        .collect()
}
