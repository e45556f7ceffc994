use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    models::{PizzaExtra, PizzaFlavor, PizzaType},
    store::MemoryCatalogStore,
};

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn pizza_type(name: &str, description: &str, base_price: Decimal) -> PizzaType {
    PizzaType {
        id: Uuid::new_v4(),
        name: name.into(),
        description: description.into(),
        base_price,
    }
}

fn flavor(of: &PizzaType, name: &str, description: &str, price: Decimal) -> PizzaFlavor {
    PizzaFlavor {
        id: Uuid::new_v4(),
        name: name.into(),
        description: description.into(),
        type_id: of.id,
        price,
    }
}

fn extra(name: &str, description: &str, price: Decimal) -> PizzaExtra {
    PizzaExtra {
        id: Uuid::new_v4(),
        name: name.into(),
        description: description.into(),
        price,
    }
}

/// Starter menu loaded when the service boots.
pub fn demo_catalog() -> MemoryCatalogStore {
    let tradicional = pizza_type(
        "Tradicional",
        "Massa fina, 8 fatias",
        money(3000),
    );
    let especial = pizza_type(
        "Especial",
        "Massa artesanal de fermentação longa, 8 fatias",
        money(4200),
    );
    let doce = pizza_type("Doce", "Broto doce, 4 fatias", money(2500));

    let flavors = vec![
        flavor(&tradicional, "Margherita", "Molho de tomate, mussarela e manjericão", money(0)),
        flavor(&tradicional, "Calabresa", "Calabresa fatiada e cebola", money(300)),
        flavor(&tradicional, "Portuguesa", "Presunto, ovo, cebola e azeitona", money(500)),
        flavor(&especial, "Quatro Queijos", "Mussarela, provolone, parmesão e gorgonzola", money(600)),
        flavor(&especial, "Pepperoni", "Pepperoni artesanal", money(800)),
        flavor(&doce, "Chocolate com Morango", "Chocolate ao leite e morangos frescos", money(400)),
    ];

    let extras = vec![
        extra("Borda recheada", "Catupiry na borda", money(800)),
        extra("Bacon", "Porção extra de bacon", money(500)),
        extra("Queijo extra", "Mais mussarela", money(300)),
        extra("Azeitonas", "Azeitonas pretas", money(200)),
    ];

    MemoryCatalogStore::new(vec![tradicional, especial, doce], flavors, extras)
}
