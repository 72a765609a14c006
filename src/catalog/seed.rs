//! Fixed seed catalog
//!
//! Loaded once by `wheelhouse seed` (or on first `serve` against an empty
//! database). Identifiers are assigned here and stay stable forever.

use super::Vehicle;

struct SeedCar {
    id: i64,
    title: &'static str,
    brand: &'static str,
    model: &'static str,
    year: i32,
    price: i64,
    body_type: &'static str,
    mileage: i64,
    fuel_type: &'static str,
    transmission: &'static str,
    city: &'static str,
    image: Option<&'static str>,
    tags: &'static [&'static str],
    description: &'static str,
}

const SEED: &[SeedCar] = &[
    SeedCar {
        id: 1,
        title: "Toyota RAV4",
        brand: "Toyota",
        model: "RAV4",
        year: 2018,
        price: 1_850_000,
        body_type: "SUV",
        mileage: 75_000,
        fuel_type: "petrol",
        transmission: "automatic",
        city: "Москва",
        image: Some("https://img.wheelhouse.dev/cars/toyota-rav4.jpg"),
        tags: &["comfort", "family", "big_trunk"],
        description: "Комфортный семейный кроссовер с высоким клиренсом и просторным салоном.",
    },
    SeedCar {
        id: 2,
        title: "Kia Sportage",
        brand: "Kia",
        model: "Sportage",
        year: 2019,
        price: 2_100_000,
        body_type: "crossover",
        mileage: 60_000,
        fuel_type: "petrol",
        transmission: "automatic",
        city: "Санкт-Петербург",
        image: Some("https://img.wheelhouse.dev/cars/kia-sportage.jpg"),
        tags: &["family", "comfort"],
        description: "Современный кроссовер с хорошей шумоизоляцией и богатой комплектацией.",
    },
    SeedCar {
        id: 3,
        title: "Skoda Octavia",
        brand: "Skoda",
        model: "Octavia",
        year: 2017,
        price: 1_350_000,
        body_type: "sedan",
        mileage: 90_000,
        fuel_type: "petrol",
        transmission: "automatic",
        city: "Новосибирск",
        image: Some("https://img.wheelhouse.dev/cars/skoda-octavia.jpg"),
        tags: &["economy", "family", "big_trunk"],
        description: "Практичный семейный седан с большим багажником и экономичным двигателем.",
    },
    SeedCar {
        id: 4,
        title: "Volkswagen Golf",
        brand: "Volkswagen",
        model: "Golf",
        year: 2016,
        price: 1_100_000,
        body_type: "hatchback",
        mileage: 100_000,
        fuel_type: "petrol",
        transmission: "manual",
        city: "Екатеринбург",
        image: Some("https://img.wheelhouse.dev/cars/vw-golf.jpg"),
        tags: &["economy", "city"],
        description: "Компактный и экономичный хэтчбек для города.",
    },
    SeedCar {
        id: 5,
        title: "Hyundai Santa Fe",
        brand: "Hyundai",
        model: "Santa Fe",
        year: 2020,
        price: 2_600_000,
        body_type: "SUV",
        mileage: 40_000,
        fuel_type: "diesel",
        transmission: "automatic",
        city: "Казань",
        image: Some("https://img.wheelhouse.dev/cars/hyundai-santa-fe.jpg"),
        tags: &["family", "comfort", "big_trunk"],
        description: "Большой семейный внедорожник с экономичным дизелем.",
    },
    SeedCar {
        id: 6,
        title: "BMW X5",
        brand: "BMW",
        model: "X5",
        year: 2019,
        price: 5_400_000,
        body_type: "SUV",
        mileage: 55_000,
        fuel_type: "diesel",
        transmission: "automatic",
        city: "Москва",
        image: Some("https://img.wheelhouse.dev/cars/bmw-x5.jpg"),
        tags: &["premium", "luxury", "comfort", "big_trunk"],
        description: "Премиальный внедорожник с мощным дизелем и полным приводом.",
    },
    SeedCar {
        id: 7,
        title: "Mercedes-Benz E-Class",
        brand: "Mercedes-Benz",
        model: "E-Class",
        year: 2020,
        price: 4_200_000,
        body_type: "sedan",
        mileage: 35_000,
        fuel_type: "petrol",
        transmission: "automatic",
        city: "Москва",
        image: Some("https://img.wheelhouse.dev/cars/mercedes-e-class.jpg"),
        tags: &["premium", "luxury", "comfort"],
        description: "Бизнес-седан с роскошным салоном и адаптивной подвеской.",
    },
    SeedCar {
        id: 8,
        title: "Audi Q7",
        brand: "Audi",
        model: "Q7",
        year: 2018,
        price: 3_900_000,
        body_type: "SUV",
        mileage: 70_000,
        fuel_type: "diesel",
        transmission: "automatic",
        city: "Санкт-Петербург",
        image: Some("https://img.wheelhouse.dev/cars/audi-q7.jpg"),
        tags: &["premium", "comfort", "family", "big_trunk"],
        description: "Семиместный премиум-кроссовер для большой семьи.",
    },
    SeedCar {
        id: 9,
        title: "Lexus RX",
        brand: "Lexus",
        model: "RX",
        year: 2021,
        price: 5_800_000,
        body_type: "crossover",
        mileage: 20_000,
        fuel_type: "petrol",
        transmission: "automatic",
        city: "Казань",
        image: Some("https://img.wheelhouse.dev/cars/lexus-rx.jpg"),
        tags: &["premium", "luxury", "comfort"],
        description: "Роскошный кроссовер с гибридной надежностью Lexus.",
    },
    SeedCar {
        id: 10,
        title: "Toyota Camry",
        brand: "Toyota",
        model: "Camry",
        year: 2019,
        price: 2_300_000,
        body_type: "sedan",
        mileage: 50_000,
        fuel_type: "petrol",
        transmission: "automatic",
        city: "Новосибирск",
        image: Some("https://img.wheelhouse.dev/cars/toyota-camry.jpg"),
        tags: &["comfort", "family"],
        description: "Надежный седан бизнес-класса с просторным вторым рядом.",
    },
];

/// Build the seed catalog
pub fn seed_vehicles() -> Vec<Vehicle> {
    SEED
        .iter()
        .map(|c| Vehicle {
            id: c.id,
            title: c.title.to_string(),
            brand: c.brand.to_string(),
            model: c.model.to_string(),
            year: c.year,
            price: c.price,
            body_type: c.body_type.to_string(),
            mileage: c.mileage,
            fuel_type: c.fuel_type.to_string(),
            transmission: c.transmission.to_string(),
            city: c.city.to_string(),
            image: c.image.map(str::to_string),
            description: Some(c.description.to_string()),
            tags: c.tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}
