//! Humidor and cigar inventory endpoints

use super::{segment, ApiClient, ApiResult};
use crate::models::{Cigar, CigarUpdate, Humidor, HumidorUpdate, NewCigar, NewHumidor};

impl ApiClient {
    /// Humidors owned by the signed-in user
    pub async fn list_humidors(&self) -> ApiResult<Vec<Humidor>> {
        self.get_data("/humidors").await
    }

    pub async fn create_humidor(&self, humidor: &NewHumidor) -> ApiResult<Humidor> {
        self.post_data("/humidors", humidor).await
    }

    pub async fn get_humidor(&self, id: &str) -> ApiResult<Humidor> {
        self.get_data(&format!("/humidors/{}", segment(id))).await
    }

    pub async fn update_humidor(&self, id: &str, update: &HumidorUpdate) -> ApiResult<Humidor> {
        self.patch_data(&format!("/humidors/{}", segment(id)), update)
            .await
    }

    pub async fn delete_humidor(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/humidors/{}", segment(id))).await
    }

    pub async fn list_cigars(&self, humidor_id: &str) -> ApiResult<Vec<Cigar>> {
        self.get_data(&format!("/humidors/{}/cigars", segment(humidor_id)))
            .await
    }

    pub async fn add_cigar(&self, humidor_id: &str, cigar: &NewCigar) -> ApiResult<Cigar> {
        self.post_data(&format!("/humidors/{}/cigars", segment(humidor_id)), cigar)
            .await
    }

    /// Update quantity/notes, or move the cigar by setting `humidor_id`
    pub async fn update_cigar(&self, cigar_id: &str, update: &CigarUpdate) -> ApiResult<Cigar> {
        self.patch_data(&format!("/cigars/{}", segment(cigar_id)), update)
            .await
    }

    pub async fn delete_cigar(&self, cigar_id: &str) -> ApiResult<()> {
        self.delete(&format!("/cigars/{}", segment(cigar_id))).await
    }
}
