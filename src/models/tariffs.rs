use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

/// One screed product line. Prices are per square metre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    pub name: String,
    pub description: String,
    pub price_range: PriceRange,
    pub days: String,
    pub features: Vec<String>,
    /// Add-ons are priced on top of a base tariff.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_addon: bool,
}

/// Immutable tariff table keyed by category tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TariffCatalog(BTreeMap<String, Tariff>);

impl TariffCatalog {
    pub fn new(entries: impl IntoIterator<Item = (String, Tariff)>) -> Self {
        Self(entries.into_iter().collect())
    }
}

fn tariff(
    name: &str,
    description: &str,
    (min, max): (u32, u32),
    days: &str,
    features: &[&str],
    is_addon: bool,
) -> Tariff {
    Tariff {
        name: name.to_string(),
        description: description.to_string(),
        price_range: PriceRange { min, max },
        days: days.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        is_addon,
    }
}

impl Default for TariffCatalog {
    fn default() -> Self {
        Self::new([
            (
                "econom".to_string(),
                tariff(
                    "ЭКОНОМ",
                    "Мокрая, ручная",
                    (400, 450),
                    "28 дней",
                    &[
                        "Классика",
                        "Низкая цена материалов",
                        "Долгий срок высыхания",
                        "Высокий риск трещин",
                    ],
                    false,
                ),
            ),
            (
                "comfort".to_string(),
                tariff(
                    "КОМФОРТ",
                    "Полусухая механизированная",
                    (550, 850),
                    "5-7 дней (плитка — 2 дня, ламинат — 14–20 дней)",
                    &[
                        "Оптимальный баланс",
                        "Минимум усадки",
                        "Можно ходить через 12 часов",
                        "Самый популярный выбор",
                    ],
                    false,
                ),
            ),
            (
                "business".to_string(),
                tariff(
                    "БИЗНЕС",
                    "С армированием",
                    (150, 300),
                    "Как у базового тарифа",
                    &[
                        "Повышенная прочность",
                        "Надбавка за армирование сеткой или фиброй",
                    ],
                    true,
                ),
            ),
            (
                "premium".to_string(),
                tariff(
                    "ПРЕМИУМ",
                    "Сухая стяжка Кнауф",
                    (800, 1000),
                    "1-2 дня",
                    &[
                        "Нет мокрых процессов",
                        "Идеальная геометрия",
                        "Теплоизоляция",
                        "Высокая цена материалов",
                    ],
                    false,
                ),
            ),
            (
                "universal".to_string(),
                tariff(
                    "УНИВЕРСАЛ",
                    "Плавающая / Утепленная",
                    (250, 600),
                    "Как у базового тарифа",
                    &["Зависит от вида утеплителя", "Включает слой изоляции"],
                    true,
                ),
            ),
            (
                "self-leveling".to_string(),
                tariff(
                    "САМОВЫРАВНИВАТЕЛЬ",
                    "Финишный слой",
                    (250, 500),
                    "1-3 дня",
                    &["Финишный слой"],
                    false,
                ),
            ),
        ])
    }
}
