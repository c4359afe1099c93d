use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateNutritionPlan, FromSqliteRow, NutritionPlan, UpdateNutritionPlan};

#[derive(Clone)]
pub struct NutritionPlanRepository {
    pool: DbPool,
}

impl NutritionPlanRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<NutritionPlan>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM nutrition_plans WHERE id = ?")?;
            let result = stmt.query_row([&id], NutritionPlan::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<NutritionPlan>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM nutrition_plans WHERE user_id = ? ORDER BY created_at DESC",
            )?;
            let plans = stmt
                .query_map([&user_id], NutritionPlan::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(plans)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, data: &CreateNutritionPlan) -> Result<NutritionPlan> {
        let plan = NutritionPlan {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id.clone(),
            title: data.title.clone(),
            description: data.description.clone(),
            calorie_target: data.calorie_target,
            protein_target: data.protein_target,
            carb_target: data.carb_target,
            fat_target: data.fat_target,
            recommendations: data.recommendations.clone(),
            ai_generated: data.ai_generated.unwrap_or(true),
            created_at: Utc::now(),
        };
        let row = plan.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO nutrition_plans
                 (id, user_id, title, description, calorie_target, protein_target, carb_target, fat_target, recommendations, ai_generated, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    row.title,
                    row.description,
                    row.calorie_target,
                    row.protein_target,
                    row.carb_target,
                    row.fat_target,
                    serde_json::to_string(&row.recommendations)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                    row.ai_generated,
                    row.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(plan)
    }

    pub async fn update(
        &self,
        id: &str,
        data: UpdateNutritionPlan,
    ) -> Result<Option<NutritionPlan>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<NutritionPlan>> {
            let conn = pool.get()?;
            let Some(mut plan) = load(&conn, &id)? else {
                return Ok(None);
            };

            if let Some(title) = data.title {
                plan.title = title;
            }
            if data.description.is_some() {
                plan.description = data.description;
            }
            if data.calorie_target.is_some() {
                plan.calorie_target = data.calorie_target;
            }
            if data.protein_target.is_some() {
                plan.protein_target = data.protein_target;
            }
            if data.carb_target.is_some() {
                plan.carb_target = data.carb_target;
            }
            if data.fat_target.is_some() {
                plan.fat_target = data.fat_target;
            }
            if let Some(recommendations) = data.recommendations {
                plan.recommendations = recommendations;
            }
            if let Some(ai_generated) = data.ai_generated {
                plan.ai_generated = ai_generated;
            }

            conn.execute(
                "UPDATE nutrition_plans
                 SET title = ?, description = ?, calorie_target = ?, protein_target = ?,
                     carb_target = ?, fat_target = ?, recommendations = ?, ai_generated = ?
                 WHERE id = ?",
                rusqlite::params![
                    plan.title,
                    plan.description,
                    plan.calorie_target,
                    plan.protein_target,
                    plan.carb_target,
                    plan.fat_target,
                    serde_json::to_string(&plan.recommendations)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                    plan.ai_generated,
                    plan.id
                ],
            )?;
            Ok(Some(plan))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn load(conn: &Connection, id: &str) -> Result<Option<NutritionPlan>> {
    let mut stmt = conn.prepare("SELECT * FROM nutrition_plans WHERE id = ?")?;
    let result = stmt.query_row([id], NutritionPlan::from_row).optional()?;
    Ok(result)
}
