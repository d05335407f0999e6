use std::str::FromStr;

use super::dto::{MealView, PlanView};
use super::repo::CatalogRepo;
use super::repo_types::MealRow;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealCategory {
    Regular,
    Vegan,
    HighProtein,
}

impl MealCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MealCategory::Regular => "regular",
            MealCategory::Vegan => "vegan",
            MealCategory::HighProtein => "high-protein",
        }
    }
}

/// What the catalog browser asks for: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MealCategory),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(CategoryFilter::All),
            "regular" => Ok(CategoryFilter::Only(MealCategory::Regular)),
            "vegan" => Ok(CategoryFilter::Only(MealCategory::Vegan)),
            "high-protein" => Ok(CategoryFilter::Only(MealCategory::HighProtein)),
            other => Err(format!("unknown meal category: {other}")),
        }
    }
}

impl CategoryFilter {
    pub fn matches(self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => category == Some(c.as_str()),
        }
    }
}

pub fn filter_meals(meals: Vec<MealRow>, filter: CategoryFilter) -> Vec<MealRow> {
    meals
        .into_iter()
        .filter(|m| filter.matches(m.category.as_deref()))
        .collect()
}

pub async fn list_meals(
    repo: &dyn CatalogRepo,
    category: Option<&str>,
) -> Result<Vec<MealView>, AppError> {
    let filter = match category {
        Some(c) => c.parse::<CategoryFilter>().map_err(AppError::BadRequest)?,
        None => CategoryFilter::All,
    };
    let meals = repo.list_available_meals().await?;
    Ok(filter_meals(meals, filter)
        .into_iter()
        .map(MealView::from)
        .collect())
}

pub async fn list_plans(repo: &dyn CatalogRepo) -> Result<Vec<PlanView>, AppError> {
    let plans = repo.list_active_plans().await?;
    Ok(plans.into_iter().map(PlanView::from).collect())
}
