use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PublicRestaurantResponse;
use crate::entities::{CouponStatus, PrizeTier, prize_entity as prizes};

/// 转盘上展示的奖品（不暴露库存等字段）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WheelPrize {
    pub id: i64,
    pub name: String,
    pub tier: PrizeTier,
    pub color: Option<String>,
}

impl From<&prizes::Model> for WheelPrize {
    fn from(m: &prizes::Model) -> Self {
        WheelPrize {
            id: m.id,
            name: m.name.clone(),
            tier: m.tier,
            color: m.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WheelResponse {
    pub restaurant: PublicRestaurantResponse,
    /// 转盘扇区顺序
    pub prizes: Vec<WheelPrize>,
    /// 可选的最爱菜品
    pub food_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinResponse {
    pub prize: WheelPrize,
    /// 中奖扇区下标
    pub wheel_index: usize,
    /// 动画停止时转盘的旋转角度 (度)
    pub stop_angle: f64,
    /// 原始落点奖品不可用，已改为其它可用奖品
    pub rerolled: bool,
}

/// 两步留资表单合并后的提交
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitLeadRequest {
    #[schema(example = "Maria")]
    pub name: String,
    #[schema(example = "11999999999")]
    pub phone: String,
    /// 中奖奖品名称
    pub prize: String,
    #[schema(example = "Sexta")]
    pub day_pref: Option<String>,
    #[schema(example = "Noite")]
    pub time_pref: Option<String>,
    #[schema(example = "Pizza")]
    pub fav_product: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitLeadResponse {
    pub lead_id: i64,
    pub coupon_status: CouponStatus,
    /// 打开后与餐厅 WhatsApp 对话兑奖
    pub whatsapp_url: String,
}
