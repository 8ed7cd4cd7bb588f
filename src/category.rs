//! # Ingredient Category Module
//!
//! Assigns each node a display category for graph coloring and UI
//! filtering. Categories are defined as an ordered keyword table, first
//! match wins; ambiguous ingredients are settled by a small override table
//! checked before anything else.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::graph::{CategoryInfo, Graph};

/// One category with its matching keywords
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
    keywords: &'static [&'static str],
}

/// Category definitions; order matters, first match wins
pub static CATEGORIES: &[Category] = &[
    Category {
        id: "meat_poultry",
        label: "Meat & Poultry",
        keywords: &[
            "beef", "veal", "lamb", "pork", "bacon", "ham", "prosciutto", "pancetta", "chicken",
            "turkey", "duck", "goose", "quail", "game", "venison", "rabbit", "goat", "bison",
            "oxtail", "sausage", "chorizo", "foie gras", "lardo",
        ],
    },
    Category {
        id: "seafood",
        label: "Seafood & Fish",
        keywords: &[
            "fish", "salmon", "tuna", "cod", "halibut", "bass", "trout", "mackerel", "sardine",
            "anchov", "shrimp", "prawn", "lobster", "crab", "scallop", "clam", "mussel", "oyster",
            "squid", "octopus", "caviar", "roe", "shellfish", "seafood", "eel",
        ],
    },
    Category {
        id: "dairy_cheese",
        label: "Dairy & Cheese",
        keywords: &[
            "cheese", "cream", "butter", "milk", "yogurt", "ricotta", "mozzarella", "parmesan",
            "parmigiano", "cheddar", "gouda", "brie", "feta", "gruyère", "fontina", "pecorino",
            "mascarpone", "crème fraîche",
        ],
    },
    Category {
        id: "vegetables",
        label: "Vegetables",
        keywords: &[
            "tomato", "onion", "garlic", "shallot", "leek", "potato", "carrot", "celery",
            "broccoli", "cauliflower", "spinach", "kale", "chard", "arugula", "lettuce",
            "cabbage", "brussels", "asparagus", "artichoke", "eggplant", "zucchini", "squash",
            "pumpkin", "beet", "radish", "turnip", "parsnip", "fennel", "mushroom",
            "bell pepper", "chicory", "endive", "watercress", "bok choy", "daikon",
            "horseradish", "truffle", "corn", "green bean", "okra", "ramp", "sunchoke",
        ],
    },
    Category {
        id: "herbs_spices",
        label: "Herbs & Spices",
        keywords: &[
            "basil", "oregano", "thyme", "rosemary", "sage", "mint", "parsley", "cilantro",
            "coriander", "dill", "tarragon", "bay leaf", "marjoram", "chives", "chervil",
            "epazote", "lemongrass", "shiso", "curry leaf", "cumin", "cinnamon", "clove",
            "nutmeg", "allspice", "ginger", "turmeric", "paprika", "saffron", "cardamom",
            "vanilla", "pepper", "chile", "chili", "ancho", "chipotle", "cayenne", "mustard",
            "fenugreek", "sumac", "achiote", "annatto", "juniper", "star anise", "fennel seed",
            "caraway",
        ],
    },
    Category {
        id: "fruits",
        label: "Fruits",
        keywords: &[
            "apple", "pear", "peach", "plum", "apricot", "cherry", "berry", "strawberry",
            "raspberry", "blackberry", "blueberry", "cranberry", "citrus", "lemon", "lime",
            "orange", "grapefruit", "tangerine", "mango", "pineapple", "banana", "coconut",
            "fig", "date", "prune", "grape", "melon", "watermelon", "persimmon", "pomegranate",
            "quince", "kiwi", "passion fruit", "lychee", "kumquat", "currant", "rhubarb",
            "cassis", "gooseberry", "tamarind",
        ],
    },
    Category {
        id: "legumes",
        label: "Legumes & Beans",
        keywords: &[
            "bean", "lentil", "chickpea", "pea", "edamame", "flageolet", "cannellini", "fava",
            "hummus",
        ],
    },
    Category {
        id: "grains_starches",
        label: "Grains & Starches",
        keywords: &[
            "rice", "pasta", "noodle", "bread", "flour", "polenta", "couscous", "quinoa",
            "barley", "bulgur", "farro", "millet", "oats", "grits", "phyllo", "wonton",
            "dumpling", "risotto", "tortilla", "pita",
        ],
    },
    Category {
        id: "nuts_seeds",
        label: "Nuts & Seeds",
        keywords: &[
            "almond", "walnut", "pecan", "pistachio", "hazelnut", "cashew", "pine nut",
            "peanut", "sesame", "sunflower", "pumpkin seed", "macadamia", "chestnut",
        ],
    },
    Category {
        id: "oils_vinegars",
        label: "Oils & Vinegars",
        keywords: &[
            "olive oil", "vinegar", "balsamic", "canola", "sesame oil", "peanut oil",
            "truffle oil", "walnut oil",
        ],
    },
    Category {
        id: "sauces_condiments",
        label: "Sauces & Condiments",
        keywords: &[
            "sauce", "soy sauce", "fish sauce", "worcestershire", "mayonnaise", "aioli",
            "pesto", "mole", "salsa", "chutney", "relish", "ponzu", "tahini", "harissa",
            "sambal", "dashi", "stock", "broth", "glaze", "jus",
        ],
    },
    Category {
        id: "beverages",
        label: "Beverages",
        keywords: &[
            "wine", "beer", "ale", "brandy", "whiskey", "bourbon", "rum", "vodka", "tequila",
            "sherry", "port", "vermouth", "liqueur", "champagne", "cider", "coffee", "tea",
            "espresso", "amaretto", "calvados", "armagnac", "cognac", "kirsch",
        ],
    },
    Category {
        id: "sweets_desserts",
        label: "Sweets & Desserts",
        keywords: &[
            "chocolate", "sugar", "honey", "maple", "molasses", "caramel", "ice cream",
            "sorbet", "granita", "custard", "crème", "mousse", "cookie", "pastry", "cake",
            "tart", "compote", "jam", "jelly", "marmalade", "syrup",
        ],
    },
    Category {
        id: "other",
        label: "Other",
        keywords: &[],
    },
];

/// Manual overrides for ambiguous ingredients, checked first
static OVERRIDES: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("bell pepper", "vegetables"),
        ("bell peppers", "vegetables"),
        ("chile peppers", "herbs_spices"),
        ("black pepper", "herbs_spices"),
        ("white pepper", "herbs_spices"),
    ])
});

lazy_static! {
    /// Leftover phrase fragments land in "other" regardless of keywords
    static ref OTHER_PATTERN: Regex = Regex::new(
        r"(^and\s|^also\s|^because\s|^but\s|^the\s|^when\s|^that\s|^this\s|^\d|percent|part salt|part sugar)"
    )
    .expect("other pattern should be valid");
}

/// Assign a category id to an ingredient
pub fn get_category(ingredient: &str) -> &'static str {
    for (key, cat) in OVERRIDES.iter() {
        if ingredient.contains(key) || key.contains(ingredient) {
            return cat;
        }
    }
    if OTHER_PATTERN.is_match(ingredient) {
        return "other";
    }
    for category in CATEGORIES {
        for keyword in category.keywords {
            if ingredient.contains(keyword) {
                // bell pepper is a vegetable even though "pepper" is a spice keyword
                if category.id == "herbs_spices" && ingredient.contains("bell pepper") {
                    continue;
                }
                return category.id;
            }
        }
    }
    "other"
}

/// Tag every node with its category and record the category list and
/// per-category counts in the graph metadata. Node and edge identity are
/// never touched.
pub fn apply_categories(graph: &mut Graph) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for node in &mut graph.nodes {
        let category = get_category(&node.id);
        *counts.entry(category.to_string()).or_default() += 1;
        node.category = Some(category.to_string());
    }

    graph.metadata.categories = CATEGORIES
        .iter()
        .map(|c| CategoryInfo {
            id: c.id.to_string(),
            label: c.label.to_string(),
        })
        .collect();
    graph.metadata.category_counts = counts;
    info!("Categorized {} nodes", graph.nodes.len());
}
